#![allow(dead_code)]

pub mod box_rig;
