pub mod stacker;
