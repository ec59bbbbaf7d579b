mod center;
mod common;
mod side;
mod status;
