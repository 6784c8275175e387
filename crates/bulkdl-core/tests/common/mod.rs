#![allow(dead_code)]

pub mod id_server;
