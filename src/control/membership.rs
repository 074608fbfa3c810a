//! Функции принадлежности: треугольная и трапециевидная

use crate::error::Error;

/// Функция принадлежности терма, заданная контрольными точками
///
/// Контрольные точки не убывают: `a <= b <= c (<= d)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MembershipFunction {
    /// Треугольник (a, b, c): вершина в b
    Triangular { a: f32, b: f32, c: f32 },
    /// Трапеция (a, b, c, d): плато между b и c
    Trapezoidal { a: f32, b: f32, c: f32, d: f32 },
}

impl MembershipFunction {
    /// Треугольная функция, контрольные точки должны не убывать
    pub fn triangular(a: f32, b: f32, c: f32) -> Result<Self, Error> {
        Self::from_points(&[a, b, c])
    }

    /// Трапециевидная функция, контрольные точки должны не убывать
    pub fn trapezoidal(a: f32, b: f32, c: f32, d: f32) -> Result<Self, Error> {
        Self::from_points(&[a, b, c, d])
    }

    /// Создание по срезу контрольных точек: 3 точки - треугольник, 4 - трапеция
    pub fn from_points(points: &[f32]) -> Result<Self, Error> {
        if points.iter().any(|p| !p.is_finite()) {
            return Err(Error::InvalidShape);
        }
        if points.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::InvalidShape);
        }

        match *points {
            [a, b, c] => Ok(MembershipFunction::Triangular { a, b, c }),
            [a, b, c, d] => Ok(MembershipFunction::Trapezoidal { a, b, c, d }),
            _ => Err(Error::InvalidShape),
        }
    }

    /// Проверка инварианта для функций, собранных напрямую из вариантов
    pub fn is_valid(&self) -> bool {
        let (a, b, c, d) = self.bounds();
        [a, b, c, d].iter().all(|p| p.is_finite()) && a <= b && b <= c && c <= d
    }

    /// Левая и правая границы носителя
    pub fn support(&self) -> (f32, f32) {
        let (a, _, _, d) = self.bounds();
        (a, d)
    }

    /// Степень принадлежности x к терму, всегда в [0, 1]
    pub fn evaluate(&self, x: f32) -> f32 {
        if x.is_nan() {
            return 0.0;
        }

        let (a, b, c, d) = self.bounds();
        let degree = if x < a || x > d {
            0.0
        } else if x >= b && x <= c {
            // Вершина треугольника или плато трапеции
            1.0
        } else if x < b {
            // a < b гарантировано: при a == b сюда попадает только x < a
            (x - a) / (b - a)
        } else {
            (d - x) / (d - c)
        };

        degree.clamp(0.0, 1.0)
    }

    /// Точки в виде трапеции: треугольник (a, b, c) это (a, b, b, c)
    fn bounds(&self) -> (f32, f32, f32, f32) {
        match *self {
            MembershipFunction::Triangular { a, b, c } => (a, b, b, c),
            MembershipFunction::Trapezoidal { a, b, c, d } => (a, b, c, d),
        }
    }
}

/// Степень принадлежности по форме и контрольным точкам
pub fn evaluate(points: &[f32], x: f32) -> Result<f32, Error> {
    MembershipFunction::from_points(points).map(|mf| mf.evaluate(x))
}
