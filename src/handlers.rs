pub mod auth;
pub mod calves;
pub mod cows;
pub mod milk;
pub mod pregnancies;
pub mod reproduction;
pub mod vaccines;
