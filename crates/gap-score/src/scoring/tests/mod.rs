mod advice;
mod common;
mod compliance;
