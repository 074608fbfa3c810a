//! Данные, которыми обмениваются контроллеры, навигация и модель поля

use nalgebra::Point2;

use crate::utils::math::closest_point_on_rect;

/// Откуда взялась команда
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandSource {
    /// Результат нечеткого вывода
    Inference,
    /// Резервная команда: ни одно правило не сработало
    Fallback,
}

/// Команда движения
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SteeringCommand {
    pub speed: f32,         // Скорость (нормированная, за такт)
    pub direction_deg: f32, // Курс в градусах, 0 - прямо, плюс - вправо
    pub source: CommandSource,
}

impl SteeringCommand {
    pub fn is_fallback(&self) -> bool {
        self.source == CommandSource::Fallback
    }
}

/// Пара (скорость, направление)
impl From<SteeringCommand> for (f32, f32) {
    fn from(cmd: SteeringCommand) -> Self {
        (cmd.speed, cmd.direction_deg)
    }
}

/// Активный контроллер
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NavigationMode {
    /// Движение к цели
    Goal,
    /// Объезд ближайшего препятствия
    AvoidObstacle,
}

/// Прямоугольное препятствие на поле, стороны параллельны осям
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstacle {
    pub min: Point2<f32>, // Левый нижний угол
    pub max: Point2<f32>, // Правый верхний угол
}

impl Obstacle {
    /// Горизонтальная полоса: левый край, центр по y, ширина, высота
    pub fn from_strip(left_x: f32, center_y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Point2::new(left_x, center_y - height / 2.0),
            max: Point2::new(left_x + width, center_y + height / 2.0),
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn center(&self) -> Point2<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Ближайшая к точке точка препятствия
    pub fn closest_point(&self, p: &Point2<f32>) -> Point2<f32> {
        closest_point_on_rect(p, &self.min, &self.max)
    }
}

/// Положение ближайшего препятствия относительно робота
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ObstacleReading {
    pub bearing_deg: f32, // Угол на центр препятствия, [-90, 90]
    pub distance_m: f32,  // Зазор между корпусом и препятствием, >= 0
}

/// Решение навигации на одном такте
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NavigationDecision {
    pub mode: NavigationMode,
    pub command: SteeringCommand,
}
