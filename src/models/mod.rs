pub mod messagemodel;
pub mod paymentmodel;
pub mod projectmodel;
pub mod proposalmodel;
pub mod reviewmodel;
pub mod usermodel;
