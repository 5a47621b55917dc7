pub mod gates;
pub mod noise;
pub mod simulator;
pub mod state;

pub use gates::Matrix2x2;
pub use noise::NoiseChannel;
pub use simulator::Simulator;
pub use state::StateVector;
