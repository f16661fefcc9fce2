pub mod execute;
pub mod info;
pub mod split;
