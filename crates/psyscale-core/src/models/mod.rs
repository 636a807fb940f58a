pub mod condition;
pub mod interpretation;
pub mod item;
pub mod option;
pub mod response;
pub mod result;
pub mod scale;
pub mod subscale;
