pub mod pow;
pub mod unipoly;
pub mod univariate;
