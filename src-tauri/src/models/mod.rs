mod response;

pub use response::SuccessResponse;
