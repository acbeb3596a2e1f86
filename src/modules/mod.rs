pub mod catalog;
pub mod decision;
pub mod dialogue;
pub mod memory;
pub mod participant;
pub mod scoring;
pub mod storyline;
