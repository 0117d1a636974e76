pub mod file_locator;
pub mod netcdf_reader;

pub use file_locator::{locate_inputs, InputLayout};
pub use netcdf_reader::{
    NetCdfReader, Packing, VariableSpec, ACCUMULATED_VARIABLES, INSTANTANEOUS_VARIABLES,
};
