//! Машина вывода Мамдани: срабатывание правил, агрегация по максимуму и
//! дефаззификация центроидом на дискретном универсуме

use core::ops::Index;

use heapless::Vec;

use crate::control::membership::MembershipFunction;
use crate::control::rule::{Rule, RuleSpec};
use crate::control::variable::{FuzzyVariable, Term, Universe};
use crate::error::Error;

/// Максимальное число входных или выходных переменных
pub const MAX_VARIABLES: usize = 4;
/// Максимальное число правил в контроллере
pub const MAX_RULES: usize = 48;

/// Описание терма в декларативной таблице
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TermSpec {
    pub name: &'static str,
    pub function: MembershipFunction,
}

impl TermSpec {
    pub const fn triangle(name: &'static str, a: f32, b: f32, c: f32) -> Self {
        Self {
            name,
            function: MembershipFunction::Triangular { a, b, c },
        }
    }

    pub const fn trapezoid(name: &'static str, a: f32, b: f32, c: f32, d: f32) -> Self {
        Self {
            name,
            function: MembershipFunction::Trapezoidal { a, b, c, d },
        }
    }
}

/// Описание переменной в декларативной таблице
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariableSpec {
    pub name: &'static str,
    pub universe: Universe,
    pub terms: &'static [TermSpec],
}

impl VariableSpec {
    pub fn build(&self) -> Result<FuzzyVariable, Error> {
        let mut variable = FuzzyVariable::new(self.name, self.universe)?;
        for term in self.terms {
            variable.add_term(term.name, term.function)?;
        }
        Ok(variable)
    }
}

/// Выходное четкое значение
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Output {
    pub variable: &'static str,
    pub value: f32,
}

/// Результат вывода: четкие значения выходных переменных
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outputs {
    values: Vec<Output, MAX_VARIABLES>,
}

impl Outputs {
    /// Значение выходной переменной по имени
    pub fn get(&self, variable: &str) -> Option<f32> {
        self.values
            .iter()
            .find(|o| o.variable == variable)
            .map(|o| o.value)
    }

    /// Значение по индексу выходной переменной
    pub fn value(&self, index: usize) -> Option<f32> {
        self.values.get(index).map(|o| o.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Output> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Index<usize> for Outputs {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        &self.values[index].value
    }
}

/// Выходная переменная не получила ни одного вклада от правил
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyOutput {
    pub variable: &'static str,
}

impl From<EmptyOutput> for Error {
    fn from(e: EmptyOutput) -> Self {
        Error::DefuzzificationEmpty { variable: e.variable }
    }
}

/// Система нечеткого вывода: реестр переменных и упорядоченный список правил
///
/// После сборки не изменяется; все промежуточные данные вывода живут на стеке
/// вызова, поэтому систему можно разделять между потоками.
#[derive(Debug, Clone)]
pub struct FuzzySystem {
    inputs: Vec<FuzzyVariable, MAX_VARIABLES>,
    outputs: Vec<FuzzyVariable, MAX_VARIABLES>,
    rules: Vec<Rule, MAX_RULES>,
}

impl FuzzySystem {
    /// Сборка из декларативной таблицы. Любая неразрешенная ссылка - ошибка
    pub fn from_specs(
        inputs: &[VariableSpec],
        outputs: &[VariableSpec],
        rules: &[RuleSpec],
    ) -> Result<Self, Error> {
        let mut system = Self {
            inputs: Vec::new(),
            outputs: Vec::new(),
            rules: Vec::new(),
        };

        for spec in inputs {
            system.add_input(spec.build()?)?;
        }
        for spec in outputs {
            system.add_output(spec.build()?)?;
        }
        for spec in rules {
            let rule = spec.resolve(&system.inputs, &system.outputs)?;
            system.add_rule(rule)?;
        }

        Ok(system)
    }

    fn add_input(&mut self, variable: FuzzyVariable) -> Result<usize, Error> {
        Self::register(&mut self.inputs, &self.outputs, variable)
    }

    fn add_output(&mut self, variable: FuzzyVariable) -> Result<usize, Error> {
        Self::register(&mut self.outputs, &self.inputs, variable)
    }

    fn register(
        target: &mut Vec<FuzzyVariable, MAX_VARIABLES>,
        other: &[FuzzyVariable],
        variable: FuzzyVariable,
    ) -> Result<usize, Error> {
        let name = variable.name();
        if target.iter().chain(other.iter()).any(|v| v.name() == name) {
            return Err(Error::DuplicateVariable { variable: name });
        }
        target.push(variable).map_err(|_| Error::CapacityExceeded)?;
        Ok(target.len() - 1)
    }

    /// Правила приходят только из `RuleSpec::resolve`, ссылки уже проверены
    fn add_rule(&mut self, rule: Rule) -> Result<(), Error> {
        self.rules.push(rule).map_err(|_| Error::CapacityExceeded)
    }

    pub fn inputs(&self) -> &[FuzzyVariable] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[FuzzyVariable] {
        &self.outputs
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn input_index(&self, name: &'static str) -> Result<usize, Error> {
        self.inputs
            .iter()
            .position(|v| v.name() == name)
            .ok_or(Error::UnknownVariable { variable: name })
    }

    pub fn output_index(&self, name: &'static str) -> Result<usize, Error> {
        self.outputs
            .iter()
            .position(|v| v.name() == name)
            .ok_or(Error::UnknownVariable { variable: name })
    }

    /// Силы срабатывания всех правил в порядке их объявления
    pub fn firing_strengths(&self, crisp: &[f32]) -> Vec<f32, MAX_RULES> {
        self.rules
            .iter()
            .map(|rule| rule.fire(&self.inputs, crisp))
            .collect()
    }

    /// Полный вывод: четкие входы в порядке входных переменных
    pub fn infer(&self, crisp: &[f32]) -> Result<Outputs, Error> {
        if crisp.len() != self.inputs.len() {
            return Err(Error::InputCount {
                expected: self.inputs.len(),
                actual: crisp.len(),
            });
        }
        Ok(self.evaluate(crisp)?)
    }

    /// Вывод без проверки числа входов; единственный возможный отказ -
    /// пустое агрегированное множество выхода
    pub(crate) fn evaluate(&self, crisp: &[f32]) -> Result<Outputs, EmptyOutput> {
        let strengths = self.firing_strengths(crisp);

        let values = self
            .outputs
            .iter()
            .enumerate()
            .map(|(index, variable)| {
                self.defuzzify(index, variable, &strengths).map(|value| Output {
                    variable: variable.name(),
                    value,
                })
            })
            .collect::<Result<Vec<Output, MAX_VARIABLES>, EmptyOutput>>()?;
        Ok(Outputs { values })
    }

    /// Степень агрегированного (импликационного) множества выхода в точке x
    ///
    /// Каждое заключение срезается по силе своего правила (минимум), вклады
    /// всех правил объединяются максимумом.
    pub fn implied_degree(&self, output: usize, x: f32, strengths: &[f32]) -> f32 {
        let Some(variable) = self.outputs.get(output) else {
            return 0.0;
        };
        let terms: &[Term] = variable.terms();

        self.rules
            .iter()
            .zip(strengths.iter())
            .filter(|&(_, &strength)| strength > 0.0)
            .flat_map(|(rule, &strength)| {
                rule.consequents()
                    .iter()
                    .filter(move |c| c.variable == output)
                    .map(move |c| (c.term, strength))
            })
            .map(|(term, strength)| {
                terms
                    .get(term)
                    .map_or(0.0, |t| t.function.evaluate(x).min(strength))
            })
            .fold(0.0, f32::max)
    }

    /// Центроид: sum(x * mu) / sum(mu) по точкам универсума
    fn defuzzify(
        &self,
        index: usize,
        variable: &FuzzyVariable,
        strengths: &[f32],
    ) -> Result<f32, EmptyOutput> {
        let mut weighted = 0.0f32;
        let mut total = 0.0f32;

        for x in variable.universe().samples() {
            let degree = self.implied_degree(index, x, strengths);
            weighted += x * degree;
            total += degree;
        }

        if total <= 0.0 {
            return Err(EmptyOutput {
                variable: variable.name(),
            });
        }
        Ok(weighted / total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::rule::ClauseSpec;

    const ANGLE: VariableSpec = VariableSpec {
        name: "angle",
        universe: Universe::new(-90.0, 90.0, 1.0),
        terms: &[
            TermSpec::trapezoid("left", -90.0, -90.0, -40.0, 0.0),
            TermSpec::triangle("front", -40.0, 0.0, 40.0),
            TermSpec::trapezoid("right", 0.0, 40.0, 90.0, 90.0),
        ],
    };

    const LEVEL: VariableSpec = VariableSpec {
        name: "level",
        universe: Universe::new(0.0, 10.0, 1.0),
        terms: &[
            TermSpec::triangle("low", 0.0, 2.0, 4.0),
            TermSpec::triangle("high", 6.0, 8.0, 10.0),
        ],
    };

    const TURN: VariableSpec = VariableSpec {
        name: "turn",
        universe: Universe::new(-90.0, 90.0, 1.0),
        terms: &[
            TermSpec::trapezoid("left", -90.0, -90.0, -40.0, 0.0),
            TermSpec::triangle("front", -40.0, 0.0, 40.0),
            TermSpec::trapezoid("right", 0.0, 40.0, 90.0, 90.0),
        ],
    };

    const FRONT_ONLY: [RuleSpec; 1] = [RuleSpec::and(
        &[ClauseSpec::is("angle", "front")],
        &[("level", "high")],
    )];

    const STEER: [RuleSpec; 3] = [
        RuleSpec::and(&[ClauseSpec::is("angle", "left")], &[("turn", "left"), ("level", "high")]),
        RuleSpec::and(&[ClauseSpec::is("angle", "front")], &[("turn", "front"), ("level", "high")]),
        RuleSpec::and(&[ClauseSpec::is("angle", "right")], &[("turn", "right"), ("level", "low")]),
    ];

    #[test]
    fn test_single_rule_returns_term_centroid() {
        let system = FuzzySystem::from_specs(&[ANGLE], &[LEVEL], &FRONT_ONLY).unwrap();
        let out = system.infer(&[0.0]).unwrap();
        // Симметричный треугольник (6, 8, 10): центроид в вершине
        assert!((out.get("level").unwrap() - 8.0).abs() < 1e-4);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_clipping_keeps_symmetric_centroid() {
        let system = FuzzySystem::from_specs(&[ANGLE], &[LEVEL], &FRONT_ONLY).unwrap();
        let strengths = system.firing_strengths(&[20.0]);
        assert_eq!(strengths.as_slice(), &[0.5]);
        assert_eq!(system.implied_degree(0, 8.0, &strengths), 0.5);
        assert_eq!(system.implied_degree(0, 7.0, &strengths), 0.5);
        assert_eq!(system.implied_degree(0, 2.0, &strengths), 0.0);

        let out = system.infer(&[20.0]).unwrap();
        assert!((out.get("level").unwrap() - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_empty_aggregate_is_error() {
        let system = FuzzySystem::from_specs(&[ANGLE], &[LEVEL], &FRONT_ONLY).unwrap();
        // front не срабатывает на -60
        assert_eq!(
            system.infer(&[-60.0]),
            Err(Error::DefuzzificationEmpty { variable: "level" })
        );
        // Вне универсума ничего не срабатывает
        assert_eq!(
            system.infer(&[120.0]),
            Err(Error::DefuzzificationEmpty { variable: "level" })
        );
        assert_eq!(
            system.infer(&[f32::NAN]),
            Err(Error::DefuzzificationEmpty { variable: "level" })
        );
    }

    #[test]
    fn test_multiple_consequents_feed_each_output() {
        let system = FuzzySystem::from_specs(&[ANGLE], &[TURN, LEVEL], &STEER).unwrap();

        let ahead = system.infer(&[0.0]).unwrap();
        assert!(ahead.get("turn").unwrap().abs() < 1e-3);
        assert!((ahead.get("level").unwrap() - 8.0).abs() < 1e-4);

        let right = system.infer(&[60.0]).unwrap();
        assert!(right.get("turn").unwrap() > 40.0);
        assert!((right.get("level").unwrap() - 2.0).abs() < 1e-4);

        // Между правилами агрегируются оба заключения по level
        let mixed = system.infer(&[20.0]).unwrap().get("level").unwrap();
        assert!((mixed - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_input_count_checked() {
        let system = FuzzySystem::from_specs(&[ANGLE], &[LEVEL], &FRONT_ONLY).unwrap();
        assert_eq!(
            system.infer(&[0.0, 1.0]),
            Err(Error::InputCount { expected: 1, actual: 2 })
        );
    }

    #[test]
    fn test_bad_tables_rejected() {
        const BAD: [RuleSpec; 1] = [RuleSpec::and(&[ClauseSpec::is("angle", "back")], &[("level", "high")])];
        assert!(matches!(
            FuzzySystem::from_specs(&[ANGLE], &[LEVEL], &BAD),
            Err(Error::InvalidTerm { variable: "angle", term: "back" })
        ));

        assert!(matches!(
            FuzzySystem::from_specs(&[ANGLE, ANGLE], &[LEVEL], &FRONT_ONLY),
            Err(Error::DuplicateVariable { variable: "angle" })
        ));

        const BAD_SHAPE: VariableSpec = VariableSpec {
            name: "level",
            universe: Universe::new(0.0, 10.0, 1.0),
            terms: &[TermSpec::triangle("low", 4.0, 2.0, 0.0)],
        };
        assert!(matches!(
            FuzzySystem::from_specs(&[ANGLE], &[BAD_SHAPE], &[]),
            Err(Error::InvalidShape)
        ));
    }

    #[test]
    fn test_system_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FuzzySystem>();
    }
}
