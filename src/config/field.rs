//! Геометрия поля, робота и препятствий. Все размеры в метрах

/// Сторона квадратного поля
pub const FIELD_SIZE_M: f32 = 2.0;

/// Параметры робота
pub mod robot {
    /// Радиус корпуса: проверка столкновений и зазор до препятствий
    pub const RADIUS_M: f32 = 0.1;
    /// Стартовая позиция (до ограничения полем)
    pub const START_X_M: f32 = 1.0;
    pub const START_Y_M: f32 = 0.05;
    /// Допустимая область центра робота
    pub const MIN_POS_M: f32 = 0.25;
    pub const MAX_POS_M: f32 = 1.75;
    /// Перевод скорости контроллера в смещение за такт
    pub const STEP_SCALE: f32 = 0.005;
}

/// Параметры цели
pub mod target {
    /// Цель достигнута, если центр робота ближе этого радиуса
    pub const REACHED_RADIUS_M: f32 = 0.15;
    pub const MIN_X_M: f32 = 0.5;
    pub const MAX_X_M: f32 = 1.5;
    pub const MIN_Y_M: f32 = 1.7;
    pub const MAX_Y_M: f32 = 1.9;
}

/// Параметры препятствий
pub mod obstacles {
    pub const COUNT: usize = 4;
    /// Центры препятствий по y равномерно в [MIN_Y_M, MAX_Y_M]
    pub const MIN_Y_M: f32 = 0.7;
    pub const MAX_Y_M: f32 = 1.4;
    pub const MIN_WIDTH_M: f32 = 0.3;
    pub const MAX_WIDTH_M: f32 = 0.5;
    pub const HEIGHT_M: f32 = 0.1;
    /// Левый край препятствия в [MIN_X_M, MAX_X_M - ширина]
    pub const MIN_X_M: f32 = 0.2;
    pub const MAX_X_M: f32 = 1.8;
    /// Скорость по x за такт
    pub const MIN_SPEED_M: f32 = 0.0002;
    pub const MAX_SPEED_M: f32 = 0.0005;
}

/// Политика выбора контроллера
pub mod navigation {
    /// Ближе этого расстояния управляет контроллер объезда
    pub const OBSTACLE_THRESHOLD_M: f32 = 0.4;
}
