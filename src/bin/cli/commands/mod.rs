pub mod category;
pub mod due;
pub mod learn;
pub mod media;
pub mod misses;
pub mod packs;
pub mod practice;
pub mod review;
pub mod reward;
pub mod status;
