pub mod feedback;
pub mod profile;
