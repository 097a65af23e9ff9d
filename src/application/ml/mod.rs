pub mod category_encoder;
pub mod predictor;
pub mod smartcore_predictor;
