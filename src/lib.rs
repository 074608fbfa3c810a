//! Нечеткая навигация точечного робота: ядро нечеткого вывода (Мамдани),
//! контроллеры движения к цели и объезда препятствий, политика выбора
//! контроллера и упрощенная модель поля для их проверки.

#![cfg_attr(not(test), no_std)]

// Макросы логирования должны быть объявлены до остальных модулей
#[macro_use]
mod fmt;

pub mod config;
pub mod control;
pub mod data;
pub mod error;
pub mod navigation;
pub mod simulation;
pub mod utils;

pub use control::controller::{
    goal_controller, obstacle_controller, FuzzyController, GoalController, ObstacleController,
    Steering,
};
pub use control::engine::{FuzzySystem, Outputs};
pub use data::{CommandSource, NavigationDecision, NavigationMode, Obstacle, SteeringCommand};
pub use error::Error;
pub use navigation::Navigator;
pub use simulation::{StepOutcome, World};
