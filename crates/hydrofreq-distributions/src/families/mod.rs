//! Distribution families

mod exponential;
mod frechet;
mod gamma;
mod genpareto;
mod gev;
mod gumbel;
mod logistic;
mod lognormal;
mod pearson3;

pub use exponential::Exponential;
pub use frechet::Frechet;
pub use gamma::Gamma;
pub use genpareto::GeneralizedPareto;
pub use gev::GeneralizedExtremeValue;
pub use gumbel::Gumbel;
pub use logistic::Logistic;
pub use lognormal::LogNormal;
pub use pearson3::PearsonIII;
