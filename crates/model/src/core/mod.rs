pub mod data_type;
pub mod type_handle;
pub mod value;
