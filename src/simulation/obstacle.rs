//! Подвижные препятствия: горизонтальные полосы, отскакивающие от стен

use rand::Rng;

use crate::config::field::{self, obstacles};
use crate::data::Obstacle;

/// Полоса, движущаяся вдоль оси x с постоянной скоростью
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingObstacle {
    pub left_x: f32,
    pub center_y: f32,
    pub width: f32,
    /// Смещение за такт со знаком: плюс - вправо
    pub velocity: f32,
}

impl MovingObstacle {
    pub fn new(left_x: f32, center_y: f32, width: f32, velocity: f32) -> Self {
        Self {
            left_x,
            center_y,
            width,
            velocity,
        }
    }

    /// Случайная полоса на заданной высоте
    pub fn random<R: Rng + ?Sized>(rng: &mut R, center_y: f32) -> Self {
        let width = rng.gen_range(obstacles::MIN_WIDTH_M..=obstacles::MAX_WIDTH_M);
        let left_x = rng.gen_range(obstacles::MIN_X_M..=obstacles::MAX_X_M - width);
        let speed = rng.gen_range(obstacles::MIN_SPEED_M..=obstacles::MAX_SPEED_M);
        let velocity = if rng.gen_bool(0.5) { speed } else { -speed };

        Self::new(left_x, center_y, width, velocity)
    }

    /// Высота i-й полосы: равномерно между нижней и верхней
    pub fn lane_y(index: usize) -> f32 {
        let lanes = obstacles::COUNT.saturating_sub(1).max(1);
        obstacles::MIN_Y_M + (obstacles::MAX_Y_M - obstacles::MIN_Y_M) * index as f32 / lanes as f32
    }

    /// Сдвиг на один такт; у стены направление меняется на обратное
    pub fn advance(&mut self) {
        self.left_x += self.velocity;
        if self.left_x <= 0.0 || self.left_x + self.width >= field::FIELD_SIZE_M {
            self.velocity = -self.velocity;
        }
    }

    pub fn shape(&self) -> Obstacle {
        Obstacle::from_strip(self.left_x, self.center_y, self.width, obstacles::HEIGHT_M)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_lanes_span_range() {
        assert!((MovingObstacle::lane_y(0) - 0.7).abs() < 1e-6);
        assert!((MovingObstacle::lane_y(obstacles::COUNT - 1) - 1.4).abs() < 1e-6);
        assert!(MovingObstacle::lane_y(1) < MovingObstacle::lane_y(2));
    }

    #[test]
    fn test_random_within_limits() {
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..100 {
            let obstacle = MovingObstacle::random(&mut rng, 1.0);
            assert!(obstacle.width >= obstacles::MIN_WIDTH_M && obstacle.width <= obstacles::MAX_WIDTH_M);
            assert!(obstacle.left_x >= obstacles::MIN_X_M);
            assert!(obstacle.left_x + obstacle.width <= obstacles::MAX_X_M + 1e-6);
            let speed = obstacle.velocity.abs();
            assert!(speed >= obstacles::MIN_SPEED_M && speed <= obstacles::MAX_SPEED_M);
        }
    }

    #[test]
    fn test_bounces_at_walls() {
        // 0.0003 - 0.0004 < 0: левая стена пройдена
        let mut obstacle = MovingObstacle::new(0.0003, 1.0, 0.4, -0.0004);
        obstacle.advance();
        assert!(obstacle.velocity > 0.0);

        // До стены еще 0.0001: направление сохраняется
        let mut obstacle = MovingObstacle::new(0.0005, 1.0, 0.4, -0.0004);
        obstacle.advance();
        assert!(obstacle.velocity < 0.0);

        let mut obstacle = MovingObstacle::new(1.5998, 1.0, 0.4, 0.0004);
        obstacle.advance();
        assert!(obstacle.velocity < 0.0);

        let mut obstacle = MovingObstacle::new(1.0, 1.0, 0.4, 0.0004);
        obstacle.advance();
        assert!((obstacle.left_x - 1.0004).abs() < 1e-6);
        assert!(obstacle.velocity > 0.0);
    }

    #[test]
    fn test_shape() {
        let shape = MovingObstacle::new(0.5, 1.0, 0.4, 0.0).shape();
        assert!((shape.max.x - 0.9).abs() < 1e-6);
        assert!((shape.max.y - shape.min.y - obstacles::HEIGHT_M).abs() < 1e-6);
    }
}
