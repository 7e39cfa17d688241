pub mod data;
pub mod distribution;
pub mod normalizer;
pub mod odds_converter;
pub mod validator;
