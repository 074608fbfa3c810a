//! Ошибки построения и вычисления нечетких контроллеров

use core::fmt;

/// Ошибки ядра нечеткого вывода
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Терм не зарегистрирован в переменной
    InvalidTerm {
        variable: &'static str,
        term: &'static str,
    },
    /// Переменная не зарегистрирована в контроллере
    UnknownVariable { variable: &'static str },
    /// Терм с таким именем уже есть в переменной
    DuplicateTerm {
        variable: &'static str,
        term: &'static str,
    },
    /// Переменная с таким именем уже есть в контроллере
    DuplicateVariable { variable: &'static str },
    /// Неверные контрольные точки функции принадлежности
    InvalidShape,
    /// Универсум пуст или задан с неположительным шагом
    InvalidUniverse { variable: &'static str },
    /// Правило без условий или без заключений
    EmptyRule,
    /// Превышена емкость реестра (термы, правила, переменные)
    CapacityExceeded,
    /// Число четких входов не совпадает с числом входных переменных
    InputCount { expected: usize, actual: usize },
    /// Ни одно правило не дало вклада в выходную переменную
    DefuzzificationEmpty { variable: &'static str },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidTerm { variable, term } => {
                write!(f, "term '{}' is not defined for variable '{}'", term, variable)
            }
            Error::UnknownVariable { variable } => write!(f, "unknown variable '{}'", variable),
            Error::DuplicateTerm { variable, term } => {
                write!(f, "term '{}' is already defined for variable '{}'", term, variable)
            }
            Error::DuplicateVariable { variable } => {
                write!(f, "variable '{}' is already registered", variable)
            }
            Error::InvalidShape => write!(f, "membership control points must be 3 or 4 non-decreasing values"),
            Error::InvalidUniverse { variable } => {
                write!(f, "universe of variable '{}' is empty or has a non-positive step", variable)
            }
            Error::EmptyRule => write!(f, "rule needs at least one antecedent and one consequent"),
            Error::CapacityExceeded => write!(f, "registry capacity exceeded"),
            Error::InputCount { expected, actual } => {
                write!(f, "expected {} crisp inputs, got {}", expected, actual)
            }
            Error::DefuzzificationEmpty { variable } => {
                write!(f, "no rule contributes to output '{}'", variable)
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Error::InvalidTerm { variable, term } => {
                defmt::write!(fmt, "Fuzzy: invalid term {} of {}", term, variable)
            }
            Error::UnknownVariable { variable } => {
                defmt::write!(fmt, "Fuzzy: unknown variable {}", variable)
            }
            Error::DuplicateTerm { variable, term } => {
                defmt::write!(fmt, "Fuzzy: duplicate term {} of {}", term, variable)
            }
            Error::DuplicateVariable { variable } => {
                defmt::write!(fmt, "Fuzzy: duplicate variable {}", variable)
            }
            Error::InvalidShape => defmt::write!(fmt, "Fuzzy: invalid membership shape"),
            Error::InvalidUniverse { variable } => {
                defmt::write!(fmt, "Fuzzy: invalid universe of {}", variable)
            }
            Error::EmptyRule => defmt::write!(fmt, "Fuzzy: empty rule"),
            Error::CapacityExceeded => defmt::write!(fmt, "Fuzzy: capacity exceeded"),
            Error::InputCount { expected, actual } => {
                defmt::write!(fmt, "Fuzzy: expected {} inputs, got {}", expected, actual)
            }
            Error::DefuzzificationEmpty { variable } => {
                defmt::write!(fmt, "Fuzzy: empty output set {}", variable)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_term_and_variable() {
        let text = std::format!("{}", Error::InvalidTerm { variable: "angle", term: "up" });
        assert!(text.contains("'up'"));
        assert!(text.contains("'angle'"));
    }
}
