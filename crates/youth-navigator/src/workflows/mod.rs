pub mod intake;
pub mod matching;
