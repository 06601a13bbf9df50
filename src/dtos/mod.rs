pub mod common;
pub mod messagedtos;
pub mod paymentdtos;
pub mod projectdtos;
pub mod proposaldtos;
pub mod reviewdtos;
pub mod userdtos;
