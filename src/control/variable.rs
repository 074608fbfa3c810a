//! Лингвистические переменные и их универсумы

use heapless::Vec;
use num_traits::AsPrimitive;

use crate::control::membership::MembershipFunction;
use crate::error::Error;

/// Максимальное число термов в одной переменной
pub const MAX_TERMS: usize = 8;

/// Дискретный универсум: точки start, start + step, ..., stop
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Universe {
    start: f32,
    stop: f32,
    step: f32,
}

impl Universe {
    pub const fn new(start: f32, stop: f32, step: f32) -> Self {
        Self { start, stop, step }
    }

    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn stop(&self) -> f32 {
        self.stop
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Границы конечны, шаг положительный, stop не меньше start
    pub fn is_valid(&self) -> bool {
        self.start.is_finite()
            && self.stop.is_finite()
            && self.step.is_finite()
            && self.step > 0.0
            && self.stop >= self.start
    }

    /// Количество точек дискретизации
    pub fn len(&self) -> usize {
        if !self.is_valid() {
            return 0;
        }
        // Округление защищает от 0.30 / 0.01 = 29.999...
        let spans: usize = ((self.stop - self.start) / self.step + 0.5).as_();
        spans + 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// i-я точка универсума
    pub fn sample(&self, index: usize) -> f32 {
        let offset: f32 = index.as_();
        self.start + offset * self.step
    }

    /// Все точки универсума по возрастанию
    pub fn samples(&self) -> impl Iterator<Item = f32> + '_ {
        (0..self.len()).map(move |i| self.sample(i))
    }

    /// Принадлежит ли x отрезку универсума (с допуском в долю шага)
    pub fn contains(&self, x: f32) -> bool {
        let tolerance = self.step * 1e-3;
        x >= self.start - tolerance && x <= self.stop + tolerance
    }
}

/// Терм: имя и его функция принадлежности
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Term {
    pub name: &'static str,
    pub function: MembershipFunction,
}

/// Лингвистическая переменная (вход или выход контроллера)
#[derive(Debug, Clone)]
pub struct FuzzyVariable {
    name: &'static str,
    universe: Universe,
    terms: Vec<Term, MAX_TERMS>,
}

impl FuzzyVariable {
    /// Создание переменной без термов
    pub fn new(name: &'static str, universe: Universe) -> Result<Self, Error> {
        if !universe.is_valid() {
            return Err(Error::InvalidUniverse { variable: name });
        }

        Ok(Self {
            name,
            universe,
            terms: Vec::new(),
        })
    }

    /// Добавление терма в стиле builder
    pub fn with_term(mut self, name: &'static str, function: MembershipFunction) -> Result<Self, Error> {
        self.add_term(name, function)?;
        Ok(self)
    }

    /// Регистрация терма, возвращает его индекс
    pub fn add_term(&mut self, name: &'static str, function: MembershipFunction) -> Result<usize, Error> {
        if !function.is_valid() {
            return Err(Error::InvalidShape);
        }
        if self.terms.iter().any(|t| t.name == name) {
            return Err(Error::DuplicateTerm {
                variable: self.name,
                term: name,
            });
        }

        let (low, high) = function.support();
        if !self.universe.contains(low) || !self.universe.contains(high) {
            // Допустимо: часть функции просто не попадет в дискретизацию
            warn!(
                "Терм {} переменной {} выходит за пределы универсума [{}, {}]",
                name,
                self.name,
                self.universe.start(),
                self.universe.stop()
            );
        }

        self.terms
            .push(Term { name, function })
            .map_err(|_| Error::CapacityExceeded)?;
        Ok(self.terms.len() - 1)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Индекс терма по имени
    pub fn term_index(&self, term: &'static str) -> Result<usize, Error> {
        self.terms
            .iter()
            .position(|t| t.name == term)
            .ok_or(Error::InvalidTerm {
                variable: self.name,
                term,
            })
    }

    /// Степень принадлежности x к терму по имени
    pub fn membership(&self, term: &'static str, x: f32) -> Result<f32, Error> {
        let index = self.term_index(term)?;
        Ok(self.degree(index, x))
    }

    /// Степень принадлежности по индексу терма; вне универсума всегда 0
    pub(crate) fn degree(&self, index: usize, x: f32) -> f32 {
        if !self.universe.contains(x) {
            return 0.0;
        }
        self.terms
            .get(index)
            .map_or(0.0, |t| t.function.evaluate(x))
    }

    /// Фаззификация: степени всех термов в порядке регистрации
    pub fn fuzzify(&self, x: f32) -> Vec<f32, MAX_TERMS> {
        (0..self.terms.len()).map(|i| self.degree(i, x)).collect()
    }
}
