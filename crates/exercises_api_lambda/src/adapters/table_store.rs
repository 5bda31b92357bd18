use exercises_api_core::entity::RawRow;

/// Read access to the exercises table.
pub trait ExerciseTable {
    /// Returns every stored row, following backend pagination to the end.
    fn scan_all(&self) -> Result<Vec<RawRow>, String>;

    fn get_item(&self, exercise_id: &str) -> Result<Option<RawRow>, String>;
}
