//! Упрощенная модель поля 2 x 2 м для прогона навигации без визуализации

pub mod obstacle;

pub use obstacle::MovingObstacle;

use heapless::Vec;
use nalgebra::Point2;
use rand::Rng;

use crate::config::field::{obstacles, robot, target};
use crate::data::{NavigationDecision, Obstacle};
use crate::error::Error;
use crate::navigation::Navigator;
use crate::utils::math::{constrain, direction_vector, distance};

/// Итог одного такта
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepOutcome {
    Running,
    Collision,
    GoalReached,
}

/// Состояние поля: робот, цель, препятствия и навигатор
#[derive(Debug, Clone)]
pub struct World {
    navigator: Navigator,
    robot: Point2<f32>,
    target: Point2<f32>,
    obstacles: Vec<MovingObstacle, { obstacles::COUNT }>,
    ticks: u32,
    last_decision: Option<NavigationDecision>,
}

impl World {
    /// Поле со случайной целью и препятствиями
    pub fn new<R: Rng + ?Sized>(navigator: Navigator, rng: &mut R) -> Self {
        let mut world = Self {
            navigator,
            robot: start_position(),
            target: Point2::origin(),
            obstacles: Vec::new(),
            ticks: 0,
            last_decision: None,
        };
        world.reset(rng);
        world
    }

    /// Поле с заданной целью и препятствиями
    pub fn with_layout(
        navigator: Navigator,
        target: Point2<f32>,
        layout: &[MovingObstacle],
    ) -> Result<Self, Error> {
        Ok(Self {
            navigator,
            robot: start_position(),
            target,
            obstacles: Vec::from_slice(layout).map_err(|_| Error::CapacityExceeded)?,
            ticks: 0,
            last_decision: None,
        })
    }

    /// Новый эпизод: робот на старте, новые цель и препятствия
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.robot = start_position();
        self.target = Point2::new(
            rng.gen_range(target::MIN_X_M..=target::MAX_X_M),
            rng.gen_range(target::MIN_Y_M..=target::MAX_Y_M),
        );
        self.obstacles = (0..obstacles::COUNT)
            .map(|lane| MovingObstacle::random(rng, MovingObstacle::lane_y(lane)))
            .collect();
        self.ticks = 0;
        self.last_decision = None;
        debug!("Поле: новый эпизод, цель ({}, {})", self.target.x, self.target.y);
    }

    pub fn robot(&self) -> Point2<f32> {
        self.robot
    }

    pub fn target(&self) -> Point2<f32> {
        self.target
    }

    pub fn obstacles(&self) -> &[MovingObstacle] {
        &self.obstacles
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Решение навигатора на последнем такте
    pub fn last_decision(&self) -> Option<NavigationDecision> {
        self.last_decision
    }

    /// Текущие контуры препятствий
    pub fn shapes(&self) -> Vec<Obstacle, { obstacles::COUNT }> {
        self.obstacles.iter().map(MovingObstacle::shape).collect()
    }

    /// Один такт модели
    pub fn step(&mut self) -> StepOutcome {
        self.ticks = self.ticks.wrapping_add(1);

        for obstacle in self.obstacles.iter_mut() {
            obstacle.advance();
        }
        let shapes = self.shapes();

        let decision = self.navigator.command(&self.robot, &self.target, &shapes);
        self.last_decision = Some(decision);

        let motion = direction_vector(decision.command.direction_deg) * (decision.command.speed * robot::STEP_SCALE);
        self.robot += motion;

        // Столкновение проверяется до ограничения полем
        if self.collides(&shapes) {
            info!("Поле: столкновение на такте {}", self.ticks);
            return StepOutcome::Collision;
        }
        self.robot.x = constrain(self.robot.x, robot::MIN_POS_M, robot::MAX_POS_M);
        self.robot.y = constrain(self.robot.y, robot::MIN_POS_M, robot::MAX_POS_M);
        if distance(&self.robot, &self.target) < target::REACHED_RADIUS_M {
            info!("Поле: цель достигнута на такте {}", self.ticks);
            return StepOutcome::GoalReached;
        }
        StepOutcome::Running
    }

    /// Прогон до столкновения, достижения цели или исчерпания тактов
    pub fn run(&mut self, max_ticks: u32) -> StepOutcome {
        for _ in 0..max_ticks {
            let outcome = self.step();
            if outcome != StepOutcome::Running {
                return outcome;
            }
        }
        StepOutcome::Running
    }

    /// Пересечение корпуса робота (круг) с любым препятствием
    fn collides(&self, shapes: &[Obstacle]) -> bool {
        shapes
            .iter()
            .any(|shape| distance(&self.robot, &shape.closest_point(&self.robot)) < robot::RADIUS_M)
    }
}

fn start_position() -> Point2<f32> {
    Point2::new(
        constrain(robot::START_X_M, robot::MIN_POS_M, robot::MAX_POS_M),
        constrain(robot::START_Y_M, robot::MIN_POS_M, robot::MAX_POS_M),
    )
}
