//! Фасад нечеткого контроллера: один тип, параметризованный декларативной
//! таблицей переменных и правил, с резервной командой при пустом выводе

use crate::config::controllers::{self, names};
use crate::control::engine::{EmptyOutput, FuzzySystem, VariableSpec};
use crate::control::rule::RuleSpec;
use crate::data::{CommandSource, SteeringCommand};
use crate::error::Error;

/// Как формируется направление резервной команды
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FallbackSteering {
    /// Направление равно входному углу (ехать на цель)
    PassThrough,
    /// Направление противоположно входному углу (уйти от препятствия)
    Mirror,
}

/// Резервная команда, подставляемая вместо пустого результата вывода
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Fallback {
    pub speed: f32,
    pub steering: FallbackSteering,
}

impl Fallback {
    /// Резервная команда для входного угла. Нечисловой угол дает курс 0
    pub fn command(&self, angle_deg: f32) -> SteeringCommand {
        let angle = if angle_deg.is_finite() { angle_deg } else { 0.0 };
        let direction_deg = match self.steering {
            FallbackSteering::PassThrough => angle,
            FallbackSteering::Mirror => -angle,
        };

        SteeringCommand {
            speed: self.speed,
            direction_deg,
            source: CommandSource::Fallback,
        }
    }
}

/// Декларативное описание контроллера
#[derive(Debug, Clone, Copy)]
pub struct ControllerTable {
    pub name: &'static str,
    /// Первым входом всегда идет угол, по нему строится резервная команда
    pub inputs: &'static [VariableSpec],
    /// Среди выходов обязаны быть `speed` и `direction`
    pub outputs: &'static [VariableSpec],
    pub rules: &'static [RuleSpec],
    pub fallback: Fallback,
}

/// Нечеткий контроллер с N четкими входами
#[derive(Debug, Clone)]
pub struct FuzzyController<const N: usize> {
    name: &'static str,
    system: FuzzySystem,
    speed: usize,
    direction: usize,
    fallback: Fallback,
}

/// Движение к цели: вход - угол на цель
pub type GoalController = FuzzyController<1>;
/// Объезд препятствия: входы - угол и расстояние до препятствия
pub type ObstacleController = FuzzyController<2>;

impl<const N: usize> FuzzyController<N> {
    /// Сборка контроллера; некорректная таблица - ошибка, а не паника
    pub fn new(table: &ControllerTable) -> Result<Self, Error> {
        let system = FuzzySystem::from_specs(table.inputs, table.outputs, table.rules)?;

        if system.inputs().len() != N {
            return Err(Error::InputCount {
                expected: N,
                actual: system.inputs().len(),
            });
        }
        if system.inputs().first().map(|v| v.name()) != Some(names::ANGLE) {
            return Err(Error::UnknownVariable {
                variable: names::ANGLE,
            });
        }
        let speed = system.output_index(names::SPEED)?;
        let direction = system.output_index(names::DIRECTION)?;

        info!(
            "Контроллер {} собран: входов {}, правил {}",
            table.name,
            system.inputs().len(),
            system.rules().len()
        );

        Ok(Self {
            name: table.name,
            system,
            speed,
            direction,
            fallback: table.fallback,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn system(&self) -> &FuzzySystem {
        &self.system
    }

    pub fn fallback(&self) -> &Fallback {
        &self.fallback
    }

    /// Вывод без резервной команды: пустой результат возвращается как ошибка
    pub fn try_compute_inputs(&self, inputs: [f32; N]) -> Result<SteeringCommand, Error> {
        let outputs = self.system.evaluate(&inputs)?;
        Ok(SteeringCommand {
            speed: outputs[self.speed],
            direction_deg: outputs[self.direction],
            source: CommandSource::Inference,
        })
    }

    /// Вывод с резервной командой; вызывающая сторона никогда не видит ошибку
    pub fn compute_inputs(&self, inputs: [f32; N]) -> SteeringCommand {
        match self.system.evaluate(&inputs) {
            Ok(outputs) => SteeringCommand {
                speed: outputs[self.speed],
                direction_deg: outputs[self.direction],
                source: CommandSource::Inference,
            },
            Err(EmptyOutput { variable }) => {
                warn!(
                    "Контроллер {}: пустой вывод для {}, резервная команда",
                    self.name,
                    variable
                );
                self.fallback.command(inputs[0])
            }
        }
    }
}

impl FuzzyController<1> {
    /// (скорость, направление) для угла на цель в градусах
    pub fn compute(&self, angle_deg: f32) -> SteeringCommand {
        self.compute_inputs([angle_deg])
    }
}

impl FuzzyController<2> {
    /// (скорость, направление) для угла (градусы) и расстояния (метры) до препятствия
    pub fn compute(&self, angle_deg: f32, distance_m: f32) -> SteeringCommand {
        self.compute_inputs([angle_deg, distance_m])
    }
}

/// Общий интерфейс контроллеров для слоя навигации
pub trait Steering {
    /// Команда по углу (градусы) и расстоянию (метры); контроллер цели
    /// расстояние игнорирует
    fn steer(&self, angle_deg: f32, distance_m: f32) -> SteeringCommand;
}

impl Steering for FuzzyController<1> {
    fn steer(&self, angle_deg: f32, _distance_m: f32) -> SteeringCommand {
        self.compute(angle_deg)
    }
}

impl Steering for FuzzyController<2> {
    fn steer(&self, angle_deg: f32, distance_m: f32) -> SteeringCommand {
        self.compute(angle_deg, distance_m)
    }
}

/// Контроллер движения к цели из штатной таблицы
pub fn goal_controller() -> Result<GoalController, Error> {
    GoalController::new(&controllers::goal::TABLE)
}

/// Контроллер объезда препятствий из штатной таблицы
pub fn obstacle_controller() -> Result<ObstacleController, Error> {
    ObstacleController::new(&controllers::obstacle::TABLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::engine::TermSpec;
    use crate::control::rule::ClauseSpec;
    use crate::control::variable::Universe;
    use crate::config::controllers::{goal, obstacle};

    fn approx(a: f32, b: f32, tol: f32) -> bool {
        (a - b).abs() < tol
    }

    /// Центроид терма на дискретном универсуме при полном срабатывании
    fn centroid(spec: &VariableSpec, term: &str) -> f32 {
        let variable = spec.build().unwrap();
        let function = variable.terms().iter().find(|t| t.name == term).unwrap().function;
        let (mut weighted, mut total) = (0.0, 0.0);
        for x in variable.universe().samples() {
            let degree = function.evaluate(x);
            weighted += x * degree;
            total += degree;
        }
        weighted / total
    }

    #[test]
    fn test_goal_dead_ahead() {
        let controller = goal_controller().unwrap();
        let cmd = controller.compute(0.0);
        assert_eq!(cmd.source, CommandSource::Inference);
        assert!(approx(cmd.direction_deg, 0.0, 1e-3));
        assert!(approx(cmd.speed, centroid(&goal::SPEED, "fast"), 1e-5));
        assert!(approx(cmd.speed, 0.2328, 1e-3));
    }

    #[test]
    fn test_goal_symmetry() {
        let controller = goal_controller().unwrap();
        for angle in [5.0, 17.0, 30.0, 40.0, 63.0, 89.0] {
            let right = controller.compute(angle);
            let left = controller.compute(-angle);
            assert!(approx(right.direction_deg, -left.direction_deg, 1e-3), "angle {}", angle);
            assert!(approx(right.speed, left.speed, 1e-5));
            assert!(right.direction_deg > 0.0);
        }
    }

    #[test]
    fn test_goal_never_slows_down() {
        let controller = goal_controller().unwrap();
        let mut angle = -90.0;
        while angle <= 90.0 {
            let cmd = controller.compute(angle);
            assert_eq!(cmd.source, CommandSource::Inference);
            assert!(cmd.speed > 0.2, "angle {} speed {}", angle, cmd.speed);
            angle += 1.0;
        }
    }

    #[test]
    fn test_goal_fallback_passes_angle_through() {
        let controller = goal_controller().unwrap();
        let cmd = controller.compute(120.0);
        assert_eq!(cmd.source, CommandSource::Fallback);
        assert_eq!(cmd.speed, goal::FALLBACK_SPEED);
        assert_eq!(cmd.direction_deg, 120.0);

        let nan = controller.compute(f32::NAN);
        assert_eq!(nan.source, CommandSource::Fallback);
        assert_eq!(nan.direction_deg, 0.0);

        assert_eq!(
            controller.try_compute_inputs([120.0]),
            Err(Error::DefuzzificationEmpty { variable: "speed" })
        );
    }

    #[test]
    fn test_obstacle_speed_drops_when_closing_in() {
        let controller = obstacle_controller().unwrap();
        let mut previous = f32::INFINITY;
        for step in (0..=80).rev() {
            let distance = step as f32 * 0.01;
            let cmd = controller.compute(0.0, distance);
            assert_eq!(cmd.source, CommandSource::Inference);
            assert!(
                cmd.speed <= previous + 1e-5,
                "distance {}: {} > {}",
                distance,
                cmd.speed,
                previous
            );
            previous = cmd.speed;
        }
        // Вплотную к препятствию почти стоп
        assert!(previous < 0.02);
        // На пике "stop" центроид терма stop
        assert!(approx(controller.compute(0.0, 0.0).speed, centroid(&obstacle::SPEED, "stop"), 1e-5));
    }

    #[test]
    fn test_obstacle_steers_away() {
        let controller = obstacle_controller().unwrap();
        // Препятствие справа - уходим влево, слева - вправо
        assert!(controller.compute(20.0, 0.2).direction_deg < 0.0);
        assert!(controller.compute(-20.0, 0.2).direction_deg > 0.0);
        // Прямо по курсу вплотную - резкий уход
        assert!(controller.compute(0.0, 0.05).direction_deg < -60.0);
    }

    #[test]
    fn test_obstacle_fallback_mirrors_angle() {
        let controller = obstacle_controller().unwrap();
        let cmd = controller.compute(30.0, 2.0);
        assert_eq!(cmd.source, CommandSource::Fallback);
        assert_eq!(cmd.speed, obstacle::FALLBACK_SPEED);
        assert_eq!(cmd.direction_deg, -30.0);
        assert_eq!(<(f32, f32)>::from(cmd), (obstacle::FALLBACK_SPEED, -30.0));
    }

    #[test]
    fn test_single_rule_controller_with_gap() {
        const ANGLE: VariableSpec = VariableSpec {
            name: "angle",
            universe: Universe::new(-90.0, 90.0, 1.0),
            terms: &[
                TermSpec::triangle("left", -60.0, -40.0, -20.0),
                TermSpec::triangle("right", 20.0, 40.0, 60.0),
            ],
        };
        const SPEED: VariableSpec = VariableSpec {
            name: "speed",
            universe: Universe::new(0.0, 1.0, 0.1),
            terms: &[TermSpec::triangle("cruise", 0.4, 0.6, 0.8)],
        };
        const DIRECTION: VariableSpec = VariableSpec {
            name: "direction",
            universe: Universe::new(-90.0, 90.0, 1.0),
            terms: &[TermSpec::triangle("right", 20.0, 40.0, 60.0)],
        };
        const RULES: [RuleSpec; 1] = [RuleSpec::and(
            &[ClauseSpec::is("angle", "right")],
            &[("speed", "cruise"), ("direction", "right")],
        )];
        const TABLE: ControllerTable = ControllerTable {
            name: "gap",
            inputs: &[ANGLE],
            outputs: &[SPEED, DIRECTION],
            rules: &RULES,
            fallback: Fallback {
                speed: 0.1,
                steering: FallbackSteering::PassThrough,
            },
        };

        let controller = GoalController::new(&TABLE).unwrap();
        let hit = controller.compute(40.0);
        assert_eq!(hit.source, CommandSource::Inference);
        assert!(approx(hit.speed, 0.6, 1e-4));
        assert!(approx(hit.direction_deg, 40.0, 1e-3));

        // Разрыв между термами: ни одно правило не срабатывает
        let gap = controller.compute(0.0);
        assert_eq!(gap.source, CommandSource::Fallback);
        assert_eq!((gap.speed, gap.direction_deg), (0.1, 0.0));

        // Терм left есть, но правил на него нет
        assert_eq!(controller.compute(-40.0).source, CommandSource::Fallback);
    }

    #[test]
    fn test_table_shape_checked() {
        assert!(matches!(
            ObstacleController::new(&goal::TABLE),
            Err(Error::InputCount { expected: 2, actual: 1 })
        ));
        assert!(matches!(
            GoalController::new(&obstacle::TABLE),
            Err(Error::InputCount { expected: 1, actual: 2 })
        ));
    }

    #[test]
    fn test_polymorphic_steering() {
        let goal = goal_controller().unwrap();
        let obstacle = obstacle_controller().unwrap();
        let controllers: [&dyn Steering; 2] = [&goal, &obstacle];
        for controller in controllers {
            let cmd = controller.steer(0.0, 0.3);
            assert!(cmd.speed > 0.0);
        }
        assert_eq!(goal.steer(10.0, 0.1), goal.compute(10.0));
    }

    #[test]
    fn test_concurrent_compute() {
        let controller = obstacle_controller().unwrap();
        let expected = controller.compute(10.0, 0.25);
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..10 {
                        assert_eq!(controller.compute(10.0, 0.25), expected);
                    }
                });
            }
        });
    }
}
