//! Конфигурация на этапе компиляции

pub mod controllers;
pub mod field;
