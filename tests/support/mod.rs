#![allow(dead_code)]

pub mod recorders;
pub mod socket_guard;
