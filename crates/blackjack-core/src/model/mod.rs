pub mod hand;
pub mod observation;
pub mod rank;
