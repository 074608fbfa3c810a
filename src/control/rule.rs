//! Нечеткие правила и вычисление силы срабатывания

use heapless::Vec;

use crate::control::variable::FuzzyVariable;
use crate::error::Error;

/// Максимальное число условий в одном правиле
pub const MAX_CLAUSES: usize = 4;
/// Максимальное число заключений в одном правиле
pub const MAX_CONSEQUENTS: usize = 4;

/// Связка условий антецедента
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Connective {
    /// Нечеткое И (минимум)
    And,
    /// Нечеткое ИЛИ (максимум)
    Or,
}

/// Ссылка на терм переменной по индексам в реестре контроллера
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TermRef {
    pub variable: usize,
    pub term: usize,
}

/// Условие антецедента: "переменная есть терм" или "переменная не есть терм"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Clause {
    pub term: TermRef,
    pub negated: bool,
}

/// Правило с разрешенными ссылками на входные и выходные термы
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    connective: Connective,
    clauses: Vec<Clause, MAX_CLAUSES>,
    consequents: Vec<TermRef, MAX_CONSEQUENTS>,
}

impl Rule {
    pub(crate) fn new(connective: Connective) -> Self {
        Self {
            connective,
            clauses: Vec::new(),
            consequents: Vec::new(),
        }
    }

    /// Добавление условия
    pub(crate) fn when(mut self, clause: Clause) -> Result<Self, Error> {
        self.clauses.push(clause).map_err(|_| Error::CapacityExceeded)?;
        Ok(self)
    }

    /// Добавление заключения (выходная переменная, терм)
    pub(crate) fn then(mut self, consequent: TermRef) -> Result<Self, Error> {
        self.consequents
            .push(consequent)
            .map_err(|_| Error::CapacityExceeded)?;
        Ok(self)
    }

    pub fn connective(&self) -> Connective {
        self.connective
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn consequents(&self) -> &[TermRef] {
        &self.consequents
    }

    /// Сила срабатывания правила для четких входов
    ///
    /// `inputs[i]` фаззифицирует `crisp[i]`. Правило из одного условия дает
    /// степень принадлежности этого условия.
    pub fn fire(&self, inputs: &[FuzzyVariable], crisp: &[f32]) -> f32 {
        if self.clauses.is_empty() {
            return 0.0;
        }

        let degrees = self.clauses.iter().map(|clause| {
            let degree = match (inputs.get(clause.term.variable), crisp.get(clause.term.variable)) {
                (Some(variable), Some(&x)) => variable.degree(clause.term.term, x),
                _ => 0.0,
            };
            if clause.negated {
                1.0 - degree
            } else {
                degree
            }
        });

        match self.connective {
            Connective::And => degrees.fold(1.0, f32::min),
            Connective::Or => degrees.fold(0.0, f32::max),
        }
    }
}

/// Условие правила в декларативной таблице (по именам)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClauseSpec {
    pub variable: &'static str,
    pub term: &'static str,
    pub negated: bool,
}

impl ClauseSpec {
    /// "переменная есть терм"
    pub const fn is(variable: &'static str, term: &'static str) -> Self {
        Self {
            variable,
            term,
            negated: false,
        }
    }

    /// "переменная не есть терм"
    pub const fn is_not(variable: &'static str, term: &'static str) -> Self {
        Self {
            variable,
            term,
            negated: true,
        }
    }
}

/// Правило в декларативной таблице: условия и заключения по именам
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSpec {
    pub connective: Connective,
    pub when: &'static [ClauseSpec],
    pub then: &'static [(&'static str, &'static str)],
}

impl RuleSpec {
    pub const fn and(when: &'static [ClauseSpec], then: &'static [(&'static str, &'static str)]) -> Self {
        Self {
            connective: Connective::And,
            when,
            then,
        }
    }

    pub const fn or(when: &'static [ClauseSpec], then: &'static [(&'static str, &'static str)]) -> Self {
        Self {
            connective: Connective::Or,
            when,
            then,
        }
    }

    /// Разрешение имен в индексы реестра. Неизвестные имена - ошибка сборки
    pub fn resolve(&self, inputs: &[FuzzyVariable], outputs: &[FuzzyVariable]) -> Result<Rule, Error> {
        if self.when.is_empty() || self.then.is_empty() {
            return Err(Error::EmptyRule);
        }

        let mut rule = Rule::new(self.connective);
        for clause in self.when {
            rule = rule.when(Clause {
                term: lookup(inputs, clause.variable, clause.term)?,
                negated: clause.negated,
            })?;
        }
        for &(variable, term) in self.then {
            rule = rule.then(lookup(outputs, variable, term)?)?;
        }
        Ok(rule)
    }
}

/// Поиск переменной и терма по именам
fn lookup(variables: &[FuzzyVariable], variable: &'static str, term: &'static str) -> Result<TermRef, Error> {
    let index = variables
        .iter()
        .position(|v| v.name() == variable)
        .ok_or(Error::UnknownVariable { variable })?;
    let term = variables[index].term_index(term)?;
    Ok(TermRef {
        variable: index,
        term,
    })
}
