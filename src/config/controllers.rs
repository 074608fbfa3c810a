//! Таблицы нечетких контроллеров: термы, универсумы, правила, резервные команды
//!
//! Единицы: углы в градусах (0 - прямо по курсу, плюс - вправо),
//! расстояния в метрах, скорость в метрах за нормированный такт.

use crate::control::controller::{ControllerTable, Fallback, FallbackSteering};
use crate::control::engine::{TermSpec, VariableSpec};
use crate::control::rule::{ClauseSpec, RuleSpec};
use crate::control::variable::Universe;

/// Имена переменных, общие для обоих контроллеров
pub mod names {
    pub const ANGLE: &str = "angle";
    pub const DISTANCE: &str = "distance";
    pub const SPEED: &str = "speed";
    pub const DIRECTION: &str = "direction";
}

/// Универсум углов (градусы)
pub const ANGLE_UNIVERSE: Universe = Universe::new(-90.0, 90.0, 1.0);

/// Универсум скорости
pub const SPEED_UNIVERSE: Universe = Universe::new(0.0, 0.30, 0.01);

/// Контроллер движения к цели
pub mod goal {
    use super::*;

    /// Скорость резервной команды (курс совпадает с углом на цель)
    pub const FALLBACK_SPEED: f32 = 0.2;

    const SIDES: [TermSpec; 3] = [
        TermSpec::trapezoid("left", -90.0, -90.0, -40.0, 0.0),
        TermSpec::triangle("front", -40.0, 0.0, 40.0),
        TermSpec::trapezoid("right", 0.0, 40.0, 90.0, 90.0),
    ];

    pub const ANGLE: VariableSpec = VariableSpec {
        name: names::ANGLE,
        universe: ANGLE_UNIVERSE,
        terms: &SIDES,
    };

    pub const SPEED: VariableSpec = VariableSpec {
        name: names::SPEED,
        universe: SPEED_UNIVERSE,
        terms: &[
            TermSpec::trapezoid("slow", 0.0, 0.0, 0.10, 0.25),
            TermSpec::trapezoid("fast", 0.10, 0.25, 0.30, 0.30),
        ],
    };

    /// Направление повторяет разбиение угла
    pub const DIRECTION: VariableSpec = VariableSpec {
        name: names::DIRECTION,
        universe: ANGLE_UNIVERSE,
        terms: &SIDES,
    };

    // Движение к цели само по себе никогда не сбрасывает скорость
    pub const RULES: [RuleSpec; 3] = [
        RuleSpec::and(
            &[ClauseSpec::is(names::ANGLE, "left")],
            &[(names::DIRECTION, "left"), (names::SPEED, "fast")],
        ),
        RuleSpec::and(
            &[ClauseSpec::is(names::ANGLE, "front")],
            &[(names::DIRECTION, "front"), (names::SPEED, "fast")],
        ),
        RuleSpec::and(
            &[ClauseSpec::is(names::ANGLE, "right")],
            &[(names::DIRECTION, "right"), (names::SPEED, "fast")],
        ),
    ];

    pub const TABLE: ControllerTable = ControllerTable {
        name: "goal",
        inputs: &[ANGLE],
        outputs: &[SPEED, DIRECTION],
        rules: &RULES,
        fallback: Fallback {
            speed: FALLBACK_SPEED,
            steering: FallbackSteering::PassThrough,
        },
    };
}

/// Контроллер объезда препятствий
pub mod obstacle {
    use super::*;

    /// Скорость резервной команды (курс противоположен углу на препятствие)
    pub const FALLBACK_SPEED: f32 = 0.05;

    /// Термы угла на препятствие, слева направо
    pub const ANGLE_TERMS: [&str; 7] = [
        "very_left",
        "left",
        "slightly_left",
        "center",
        "slightly_right",
        "right",
        "very_right",
    ];

    /// Полосы расстояния, от ближней к дальней
    pub const DISTANCE_TERMS: [&str; 5] = ["extremely_close", "very_close", "close", "medium", "far"];

    pub const ANGLE: VariableSpec = VariableSpec {
        name: names::ANGLE,
        universe: ANGLE_UNIVERSE,
        terms: &[
            TermSpec::trapezoid("very_left", -90.0, -90.0, -75.0, -60.0),
            TermSpec::triangle("left", -75.0, -45.0, -15.0),
            TermSpec::triangle("slightly_left", -30.0, -15.0, 0.0),
            TermSpec::triangle("center", -15.0, 0.0, 15.0),
            TermSpec::triangle("slightly_right", 0.0, 15.0, 30.0),
            TermSpec::triangle("right", 15.0, 45.0, 75.0),
            TermSpec::trapezoid("very_right", 60.0, 75.0, 90.0, 90.0),
        ],
    };

    /// Расстояние в метрах; дальше 0.8 м контроллер не применяется
    pub const DISTANCE: VariableSpec = VariableSpec {
        name: names::DISTANCE,
        universe: Universe::new(0.0, 0.8, 0.01),
        terms: &[
            TermSpec::triangle("extremely_close", 0.0, 0.0, 0.15),
            TermSpec::triangle("very_close", 0.10, 0.20, 0.30),
            TermSpec::triangle("close", 0.25, 0.35, 0.45),
            TermSpec::triangle("medium", 0.40, 0.50, 0.60),
            TermSpec::trapezoid("far", 0.55, 0.65, 0.8, 0.8),
        ],
    };

    pub const SPEED: VariableSpec = VariableSpec {
        name: names::SPEED,
        universe: SPEED_UNIVERSE,
        terms: &[
            TermSpec::triangle("stop", 0.0, 0.0, 0.05),
            TermSpec::triangle("very_slow", 0.0, 0.05, 0.10),
            TermSpec::triangle("slow", 0.05, 0.10, 0.15),
            TermSpec::triangle("medium", 0.10, 0.15, 0.20),
            TermSpec::triangle("fast", 0.15, 0.25, 0.30),
        ],
    };

    pub const DIRECTION: VariableSpec = VariableSpec {
        name: names::DIRECTION,
        universe: ANGLE_UNIVERSE,
        terms: &[
            TermSpec::trapezoid("sharp_left", -90.0, -90.0, -88.0, -75.0),
            TermSpec::triangle("left", -75.0, -45.0, -15.0),
            TermSpec::triangle("slight_left", -30.0, -15.0, 0.0),
            TermSpec::triangle("center", -15.0, 0.0, 15.0),
            TermSpec::triangle("slight_right", 0.0, 15.0, 30.0),
            TermSpec::triangle("right", 15.0, 45.0, 75.0),
            TermSpec::trapezoid("sharp_right", 75.0, 88.0, 90.0, 90.0),
        ],
    };

    /// Правило "расстояние D и угол A -> направление, скорость"
    const fn rule(
        when: &'static [ClauseSpec; 2],
        then: &'static [(&'static str, &'static str); 2],
    ) -> RuleSpec {
        RuleSpec::and(when, then)
    }

    // Полная таблица 5 x 7. Препятствие по центру обходится слева.
    // Входы: зазор между корпусом и препятствием и пеленг на его центр.
    // Прямо по курсу скорость падает с зазором; сбоку робот уходит от
    // препятствия, не сбрасывая ход.
    pub const RULES: [RuleSpec; 35] = [
        // extremely_close: экстренное уклонение
        rule(&[ClauseSpec::is(names::DISTANCE, "extremely_close"), ClauseSpec::is(names::ANGLE, "very_left")], &[(names::DIRECTION, "right"), (names::SPEED, "fast")]),
        rule(&[ClauseSpec::is(names::DISTANCE, "extremely_close"), ClauseSpec::is(names::ANGLE, "left")], &[(names::DIRECTION, "sharp_right"), (names::SPEED, "medium")]),
        rule(&[ClauseSpec::is(names::DISTANCE, "extremely_close"), ClauseSpec::is(names::ANGLE, "slightly_left")], &[(names::DIRECTION, "sharp_right"), (names::SPEED, "medium")]),
        rule(&[ClauseSpec::is(names::DISTANCE, "extremely_close"), ClauseSpec::is(names::ANGLE, "center")], &[(names::DIRECTION, "sharp_left"), (names::SPEED, "stop")]),
        rule(&[ClauseSpec::is(names::DISTANCE, "extremely_close"), ClauseSpec::is(names::ANGLE, "slightly_right")], &[(names::DIRECTION, "sharp_left"), (names::SPEED, "medium")]),
        rule(&[ClauseSpec::is(names::DISTANCE, "extremely_close"), ClauseSpec::is(names::ANGLE, "right")], &[(names::DIRECTION, "sharp_left"), (names::SPEED, "medium")]),
        rule(&[ClauseSpec::is(names::DISTANCE, "extremely_close"), ClauseSpec::is(names::ANGLE, "very_right")], &[(names::DIRECTION, "left"), (names::SPEED, "fast")]),
        // very_close: сильное уклонение
        rule(&[ClauseSpec::is(names::DISTANCE, "very_close"), ClauseSpec::is(names::ANGLE, "very_left")], &[(names::DIRECTION, "slight_right"), (names::SPEED, "fast")]),
        rule(&[ClauseSpec::is(names::DISTANCE, "very_close"), ClauseSpec::is(names::ANGLE, "left")], &[(names::DIRECTION, "right"), (names::SPEED, "fast")]),
        rule(&[ClauseSpec::is(names::DISTANCE, "very_close"), ClauseSpec::is(names::ANGLE, "slightly_left")], &[(names::DIRECTION, "sharp_right"), (names::SPEED, "medium")]),
        rule(&[ClauseSpec::is(names::DISTANCE, "very_close"), ClauseSpec::is(names::ANGLE, "center")], &[(names::DIRECTION, "sharp_left"), (names::SPEED, "very_slow")]),
        rule(&[ClauseSpec::is(names::DISTANCE, "very_close"), ClauseSpec::is(names::ANGLE, "slightly_right")], &[(names::DIRECTION, "sharp_left"), (names::SPEED, "medium")]),
        rule(&[ClauseSpec::is(names::DISTANCE, "very_close"), ClauseSpec::is(names::ANGLE, "right")], &[(names::DIRECTION, "left"), (names::SPEED, "fast")]),
        rule(&[ClauseSpec::is(names::DISTANCE, "very_close"), ClauseSpec::is(names::ANGLE, "very_right")], &[(names::DIRECTION, "slight_left"), (names::SPEED, "fast")]),
        // close: умеренное уклонение
        rule(&[ClauseSpec::is(names::DISTANCE, "close"), ClauseSpec::is(names::ANGLE, "very_left")], &[(names::DIRECTION, "center"), (names::SPEED, "fast")]),
        rule(&[ClauseSpec::is(names::DISTANCE, "close"), ClauseSpec::is(names::ANGLE, "left")], &[(names::DIRECTION, "slight_right"), (names::SPEED, "fast")]),
        rule(&[ClauseSpec::is(names::DISTANCE, "close"), ClauseSpec::is(names::ANGLE, "slightly_left")], &[(names::DIRECTION, "right"), (names::SPEED, "fast")]),
        rule(&[ClauseSpec::is(names::DISTANCE, "close"), ClauseSpec::is(names::ANGLE, "center")], &[(names::DIRECTION, "left"), (names::SPEED, "slow")]),
        rule(&[ClauseSpec::is(names::DISTANCE, "close"), ClauseSpec::is(names::ANGLE, "slightly_right")], &[(names::DIRECTION, "left"), (names::SPEED, "fast")]),
        rule(&[ClauseSpec::is(names::DISTANCE, "close"), ClauseSpec::is(names::ANGLE, "right")], &[(names::DIRECTION, "slight_left"), (names::SPEED, "fast")]),
        rule(&[ClauseSpec::is(names::DISTANCE, "close"), ClauseSpec::is(names::ANGLE, "very_right")], &[(names::DIRECTION, "center"), (names::SPEED, "fast")]),
        // medium: легкое уклонение
        rule(&[ClauseSpec::is(names::DISTANCE, "medium"), ClauseSpec::is(names::ANGLE, "very_left")], &[(names::DIRECTION, "center"), (names::SPEED, "fast")]),
        rule(&[ClauseSpec::is(names::DISTANCE, "medium"), ClauseSpec::is(names::ANGLE, "left")], &[(names::DIRECTION, "center"), (names::SPEED, "fast")]),
        rule(&[ClauseSpec::is(names::DISTANCE, "medium"), ClauseSpec::is(names::ANGLE, "slightly_left")], &[(names::DIRECTION, "slight_right"), (names::SPEED, "fast")]),
        rule(&[ClauseSpec::is(names::DISTANCE, "medium"), ClauseSpec::is(names::ANGLE, "center")], &[(names::DIRECTION, "slight_left"), (names::SPEED, "medium")]),
        rule(&[ClauseSpec::is(names::DISTANCE, "medium"), ClauseSpec::is(names::ANGLE, "slightly_right")], &[(names::DIRECTION, "slight_left"), (names::SPEED, "fast")]),
        rule(&[ClauseSpec::is(names::DISTANCE, "medium"), ClauseSpec::is(names::ANGLE, "right")], &[(names::DIRECTION, "center"), (names::SPEED, "fast")]),
        rule(&[ClauseSpec::is(names::DISTANCE, "medium"), ClauseSpec::is(names::ANGLE, "very_right")], &[(names::DIRECTION, "center"), (names::SPEED, "fast")]),
        // far: нормальное движение
        rule(&[ClauseSpec::is(names::DISTANCE, "far"), ClauseSpec::is(names::ANGLE, "very_left")], &[(names::DIRECTION, "center"), (names::SPEED, "fast")]),
        rule(&[ClauseSpec::is(names::DISTANCE, "far"), ClauseSpec::is(names::ANGLE, "left")], &[(names::DIRECTION, "center"), (names::SPEED, "fast")]),
        rule(&[ClauseSpec::is(names::DISTANCE, "far"), ClauseSpec::is(names::ANGLE, "slightly_left")], &[(names::DIRECTION, "center"), (names::SPEED, "fast")]),
        rule(&[ClauseSpec::is(names::DISTANCE, "far"), ClauseSpec::is(names::ANGLE, "center")], &[(names::DIRECTION, "slight_left"), (names::SPEED, "fast")]),
        rule(&[ClauseSpec::is(names::DISTANCE, "far"), ClauseSpec::is(names::ANGLE, "slightly_right")], &[(names::DIRECTION, "center"), (names::SPEED, "fast")]),
        rule(&[ClauseSpec::is(names::DISTANCE, "far"), ClauseSpec::is(names::ANGLE, "right")], &[(names::DIRECTION, "center"), (names::SPEED, "fast")]),
        rule(&[ClauseSpec::is(names::DISTANCE, "far"), ClauseSpec::is(names::ANGLE, "very_right")], &[(names::DIRECTION, "center"), (names::SPEED, "fast")]),
    ];

    pub const TABLE: ControllerTable = ControllerTable {
        name: "obstacle",
        inputs: &[ANGLE, DISTANCE],
        outputs: &[SPEED, DIRECTION],
        rules: &RULES,
        fallback: Fallback {
            speed: FALLBACK_SPEED,
            steering: FallbackSteering::Mirror,
        },
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::engine::FuzzySystem;

    #[test]
    fn test_obstacle_table_is_complete() {
        // Каждая пара (полоса расстояния, сектор угла) покрыта ровно одним правилом
        for distance in obstacle::DISTANCE_TERMS {
            for angle in obstacle::ANGLE_TERMS {
                let count = obstacle::RULES
                    .iter()
                    .filter(|r| {
                        r.when.contains(&ClauseSpec::is(names::DISTANCE, distance))
                            && r.when.contains(&ClauseSpec::is(names::ANGLE, angle))
                    })
                    .count();
                assert_eq!(count, 1, "{} / {}", distance, angle);
            }
        }
    }

    #[test]
    fn test_tables_resolve() {
        let goal = FuzzySystem::from_specs(goal::TABLE.inputs, goal::TABLE.outputs, goal::TABLE.rules).unwrap();
        assert_eq!(goal.rules().len(), 3);

        let obstacle =
            FuzzySystem::from_specs(obstacle::TABLE.inputs, obstacle::TABLE.outputs, obstacle::TABLE.rules)
                .unwrap();
        assert_eq!(obstacle.rules().len(), 35);
        assert_eq!(obstacle.inputs()[1].terms().len(), obstacle::DISTANCE_TERMS.len());
    }

    #[test]
    fn test_partitions_leave_no_gaps() {
        // Внутри универсумов хотя бы один терм ненулевой
        let angle = obstacle::ANGLE.build().unwrap();
        for x in angle.universe().samples() {
            assert!(angle.fuzzify(x).iter().any(|&d| d > 0.0), "angle {}", x);
        }
        let distance = obstacle::DISTANCE.build().unwrap();
        for x in distance.universe().samples() {
            assert!(distance.fuzzify(x).iter().any(|&d| d > 0.0), "distance {}", x);
        }
    }
}
