pub mod collision;
pub mod holes;
pub mod layout;
pub mod pocketing;
pub mod shot;
