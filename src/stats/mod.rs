pub mod chi_square;
