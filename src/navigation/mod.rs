//! Навигация: пеленги, ближайшее препятствие и выбор контроллера
//!
//! Система координат поля: +y - направление движения робота, +x - вправо.
//! Пеленг 0 - прямо по курсу, положительный - справа.

use nalgebra::Point2;

use crate::config::field;
use crate::control::controller::{goal_controller, obstacle_controller, GoalController, ObstacleController, Steering};
use crate::data::{NavigationDecision, NavigationMode, Obstacle, ObstacleReading};
use crate::error::Error;
use crate::utils::math::{distance, fold_to_front, heading_deg};

/// Пеленг точки `to` из точки `from` в градусах, свернутый в [-90, 90]
pub fn bearing_deg(from: &Point2<f32>, to: &Point2<f32>) -> f32 {
    fold_to_front(heading_deg(&(to - from)))
}

/// Ближайшее препятствие для робота радиуса `radius_m`
///
/// Ближайшим считается препятствие с минимальным расстоянием до его
/// ближайшей точки. Расстояние в показании - зазор между корпусом и
/// препятствием (не меньше 0), пеленг - на центр препятствия.
pub fn nearest_obstacle(robot: &Point2<f32>, radius_m: f32, obstacles: &[Obstacle]) -> Option<ObstacleReading> {
    obstacles
        .iter()
        .map(|obstacle| (obstacle, distance(robot, &obstacle.closest_point(robot))))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(obstacle, reach)| ObstacleReading {
            bearing_deg: bearing_deg(robot, &obstacle.center()),
            distance_m: (reach - radius_m).max(0.0),
        })
}

/// Навигатор: пара контроллеров и политика переключения между ними
#[derive(Debug, Clone)]
pub struct Navigator<G = GoalController, O = ObstacleController> {
    goal: G,
    obstacle: O,
    threshold_m: f32,
    robot_radius_m: f32,
    mode: NavigationMode,
}

impl Navigator {
    /// Навигатор со штатными таблицами и порогом из конфигурации
    pub fn new() -> Result<Self, Error> {
        Ok(Self::with_controllers(goal_controller()?, obstacle_controller()?))
    }
}

impl<G: Steering, O: Steering> Navigator<G, O> {
    pub fn with_controllers(goal: G, obstacle: O) -> Self {
        Self {
            goal,
            obstacle,
            threshold_m: field::navigation::OBSTACLE_THRESHOLD_M,
            robot_radius_m: field::robot::RADIUS_M,
            mode: NavigationMode::Goal,
        }
    }

    /// Порог зазора, ближе которого управляет контроллер объезда
    pub fn with_threshold(mut self, threshold_m: f32) -> Self {
        self.threshold_m = threshold_m;
        self
    }

    /// Радиус корпуса, вычитаемый из расстояния до препятствия
    pub fn with_robot_radius(mut self, radius_m: f32) -> Self {
        self.robot_radius_m = radius_m;
        self
    }

    pub fn threshold(&self) -> f32 {
        self.threshold_m
    }

    pub fn robot_radius(&self) -> f32 {
        self.robot_radius_m
    }

    /// Режим, выбранный на последнем такте
    pub fn mode(&self) -> NavigationMode {
        self.mode
    }

    pub fn goal(&self) -> &G {
        &self.goal
    }

    pub fn obstacle(&self) -> &O {
        &self.obstacle
    }

    /// Команда на текущий такт
    ///
    /// Если зазор до ближайшего препятствия не больше порога, управляет
    /// контроллер объезда, иначе - контроллер движения к цели.
    pub fn command(
        &mut self,
        robot: &Point2<f32>,
        target: &Point2<f32>,
        obstacles: &[Obstacle],
    ) -> NavigationDecision {
        let decision = match nearest_obstacle(robot, self.robot_radius_m, obstacles) {
            Some(reading) if reading.distance_m <= self.threshold_m => NavigationDecision {
                mode: NavigationMode::AvoidObstacle,
                command: self.obstacle.steer(reading.bearing_deg, reading.distance_m),
            },
            _ => NavigationDecision {
                mode: NavigationMode::Goal,
                command: self.goal.steer(bearing_deg(robot, target), distance(robot, target)),
            },
        };

        if decision.mode != self.mode {
            info!("Навигация: режим {:?} -> {:?}", self.mode, decision.mode);
            self.mode = decision.mode;
        }
        decision
    }
}
