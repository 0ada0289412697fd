pub mod dialogs;
pub mod element;
pub mod surface;
