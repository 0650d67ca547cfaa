#![cfg(test)]

mod anomaly;
mod assessment;
mod discovery;
mod scanner;
mod utils;
