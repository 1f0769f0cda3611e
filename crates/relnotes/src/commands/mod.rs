//! Command implementations

pub mod convert;

pub mod doctor;

pub mod info;
