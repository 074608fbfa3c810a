//! Математические функции и утилиты

use nalgebra::{Point2, Vector2};

/// Ограничение значения в заданных пределах
#[inline(always)]
pub fn constrain(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Нормализация угла в градусах в диапазон (-180, 180]
#[inline]
pub fn normalize_angle_deg(angle: f32) -> f32 {
    let mut normalized = angle % 360.0;
    if normalized > 180.0 {
        normalized -= 360.0;
    } else if normalized <= -180.0 {
        normalized += 360.0;
    }
    normalized
}

/// Свертка угла в передний сектор [-90, 90]
///
/// Задний пеленг отражается относительно поперечной оси: сторона
/// (лево/право) сохраняется.
#[inline]
pub fn fold_to_front(angle_deg: f32) -> f32 {
    let angle = normalize_angle_deg(angle_deg);
    if angle > 90.0 {
        180.0 - angle
    } else if angle < -90.0 {
        -180.0 - angle
    } else {
        angle
    }
}

/// Угол вектора относительно оси движения (+y), плюс - вправо (+x)
#[inline]
pub fn heading_deg(v: &Vector2<f32>) -> f32 {
    libm::atan2f(v.x, v.y).to_degrees()
}

/// Единичный вектор курса: 0 - вдоль +y, 90 - вдоль +x
#[inline]
pub fn direction_vector(direction_deg: f32) -> Vector2<f32> {
    let rad = direction_deg.to_radians();
    Vector2::new(libm::sinf(rad), libm::cosf(rad))
}

/// Ближайшая к точке точка прямоугольника, заданного углами min/max
#[inline]
pub fn closest_point_on_rect(p: &Point2<f32>, min: &Point2<f32>, max: &Point2<f32>) -> Point2<f32> {
    Point2::new(constrain(p.x, min.x, max.x), constrain(p.y, min.y, max.y))
}

/// Квадратный корень с защитой от отрицательных значений
#[inline]
pub fn safe_sqrt(value: f32) -> f32 {
    if value <= 0.0 {
        0.0
    } else {
        libm::sqrtf(value)
    }
}

/// Расстояние между точками
#[inline]
pub fn distance(a: &Point2<f32>, b: &Point2<f32>) -> f32 {
    let d = b - a;
    safe_sqrt(d.x * d.x + d.y * d.y)
}
