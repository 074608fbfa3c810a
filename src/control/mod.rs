//! Ядро нечеткого вывода и контроллеры на его основе

pub mod controller;
pub mod engine;
pub mod membership;
pub mod rule;
pub mod variable;
