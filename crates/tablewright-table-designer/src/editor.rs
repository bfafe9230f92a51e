//! Table structure editor
//!
//! Owns one editing session: the snapshot as loaded, the snapshot being
//! edited, and the session state.
//!
//! ```text
//! Loading -> Ready -> Dirty -> Saving -> Ready | Dirty
//! Loading | Ready | Dirty -> Closed
//! ```
//!
//! Every mutation keeps the `is_new` / `original_name` / `is_deleted`
//! bookkeeping the synthesizer relies on to tell renames from add+drop.

use tablewright_core::{Connection, ForeignKeyAction};

use crate::error::{DesignerError, DesignerResult};
use crate::models::{
    ColumnDesign, ColumnKey, DefaultValue, ForeignKeyDesign, IndexDesign, IndexKind, IndexMethod,
    PRIMARY_KEY_NAME, TableOptions, TableSnapshot, TypeDescriptor, lookup_data_type,
};
use crate::service::{AlterStrategy, DdlStatement, DdlSynthesizer, SnapshotLoader};

/// Lifecycle state of an editing session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    /// Snapshot fetch in flight
    Loading,
    /// No edits since the last load or save
    Ready,
    /// At least one edit since the last load or save
    Dirty,
    /// A synthesized statement is being executed
    Saving,
    Closed,
}

impl std::fmt::Display for EditorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            EditorState::Loading => "loading",
            EditorState::Ready => "ready",
            EditorState::Dirty => "dirty",
            EditorState::Saving => "saving",
            EditorState::Closed => "closed",
        })
    }
}

/// Outcome of asking to close the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDecision {
    /// Nothing unsaved; the editor is now closed
    Closed,
    /// Unsaved edits exist; call [`TableEditor::close`] to discard them
    ConfirmDiscard,
}

/// A single change to one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnEdit {
    Rename(String),
    /// Replace the whole type from its raw form, e.g. `decimal(10,2) unsigned`
    SetType(String),
    SetBaseType(String),
    SetLength(String),
    SetUnsigned(bool),
    SetZerofill(bool),
    SetNullable(bool),
    SetDefault(DefaultValue),
    SetComment(String),
    SetAutoIncrement(bool),
    SetCharset(Option<String>),
    SetCollation(Option<String>),
    SetKey(ColumnKey),
}

/// A single change to one index; name, kind, method and comment apply to
/// every row sharing the key name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexEdit {
    Rename(String),
    SetColumn(String),
    SetKind(IndexKind),
    SetMethod(IndexMethod),
    SetComment(String),
}

/// A single change to one foreign key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForeignKeyEdit {
    Rename(String),
    SetColumn(String),
    /// Also clears the referenced columns, which belonged to the old table
    SetReferencedTable(String),
    SetReferencedColumn(String),
    SetOnUpdate(ForeignKeyAction),
    SetOnDelete(ForeignKeyAction),
}

/// Editing session for one table
#[derive(Debug)]
pub struct TableEditor {
    database: String,
    table_name: String,
    is_new_table: bool,
    state: EditorState,
    original: Option<TableSnapshot>,
    current: TableSnapshot,
    synthesizer: DdlSynthesizer,
    last_error: Option<String>,
}

impl TableEditor {
    /// Start an editing session for an existing table; call [`load`](Self::load) next
    pub fn begin_open(
        database: impl Into<String>,
        table_name: impl Into<String>,
        strategy: AlterStrategy,
    ) -> Self {
        Self {
            database: database.into(),
            table_name: table_name.into(),
            is_new_table: false,
            state: EditorState::Loading,
            original: None,
            current: TableSnapshot::default(),
            synthesizer: DdlSynthesizer::new(strategy),
            last_error: None,
        }
    }

    /// Open an existing table: begin the session and load its snapshot
    pub async fn open(
        loader: &SnapshotLoader,
        database: impl Into<String>,
        table_name: impl Into<String>,
        strategy: AlterStrategy,
    ) -> DesignerResult<Self> {
        let mut editor = Self::begin_open(database, table_name, strategy);
        editor.load(loader).await?;
        Ok(editor)
    }

    /// Start designing a table that does not exist yet
    pub fn new_table(
        database: impl Into<String>,
        table_name: impl Into<String>,
        strategy: AlterStrategy,
    ) -> Self {
        Self {
            database: database.into(),
            table_name: table_name.into(),
            is_new_table: true,
            state: EditorState::Ready,
            original: None,
            current: TableSnapshot::new_default(),
            synthesizer: DdlSynthesizer::new(strategy),
            last_error: None,
        }
    }

    /// Fetch the snapshot for a session in `Loading`.
    ///
    /// A failure closes the session; there is nothing to preserve.
    pub async fn load(&mut self, loader: &SnapshotLoader) -> DesignerResult<()> {
        self.ensure_state("load", &[EditorState::Loading])?;

        match loader.load_snapshot(&self.database, &self.table_name).await {
            Ok(snapshot) => {
                self.original = Some(snapshot.clone());
                self.current = snapshot;
                self.state = EditorState::Ready;
                self.last_error = None;
                tracing::info!(database = %self.database, table = %self.table_name, "table opened for editing");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(database = %self.database, table = %self.table_name, error = %err, "failed to open table");
                self.state = EditorState::Closed;
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn is_new_table(&self) -> bool {
        self.is_new_table
    }

    /// The snapshot being edited
    pub fn current(&self) -> &TableSnapshot {
        &self.current
    }

    /// The snapshot as loaded or last saved; `None` for a new table
    pub fn original(&self) -> Option<&TableSnapshot> {
        self.original.as_ref()
    }

    /// Message of the last failed load or save
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.state == EditorState::Dirty
    }

    fn ensure_state(&self, action: &'static str, allowed: &[EditorState]) -> DesignerResult<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(DesignerError::InvalidState {
                action,
                state: self.state.to_string(),
            })
        }
    }

    fn ensure_editable(&self, action: &'static str) -> DesignerResult<()> {
        self.ensure_state(action, &[EditorState::Ready, EditorState::Dirty])
    }

    fn mark_dirty(&mut self) {
        self.state = EditorState::Dirty;
    }

    /// Rename the table being created
    pub fn set_table_name(&mut self, name: impl Into<String>) -> DesignerResult<()> {
        self.ensure_editable("rename the table")?;
        if !self.is_new_table {
            return Err(DesignerError::validation(
                "table_name",
                "Only a table that has not been created yet can be renamed here",
            ));
        }
        self.table_name = name.into();
        self.mark_dirty();
        Ok(())
    }

    // --- Columns ---

    /// Append a column; it is always treated as new
    pub fn add_column(&mut self, mut column: ColumnDesign) -> DesignerResult<usize> {
        self.ensure_editable("add a column")?;
        column.is_new = true;
        column.original_name = None;
        self.current.columns.push(column);
        self.mark_dirty();
        Ok(self.current.columns.len() - 1)
    }

    /// Apply one edit to the column at `index`
    pub fn edit_column(&mut self, index: usize, edit: ColumnEdit) -> DesignerResult<()> {
        self.ensure_editable("edit a column")?;
        let column = self
            .current
            .columns
            .get_mut(index)
            .ok_or(DesignerError::IndexOutOfRange { kind: "column", index })?;

        match edit {
            ColumnEdit::Rename(name) => {
                let old_name = std::mem::replace(&mut column.name, name.clone());
                rename_column_references(&mut self.current, &old_name, &name);
            }
            ColumnEdit::SetType(raw) => {
                column.data_type = TypeDescriptor::parse(&raw);
                fit_to_type(column, false);
            }
            ColumnEdit::SetBaseType(base_type) => {
                column.data_type.base_type = base_type;
                fit_to_type(column, true);
            }
            ColumnEdit::SetLength(length) => column.data_type.length = length,
            ColumnEdit::SetUnsigned(unsigned) => column.data_type.unsigned = unsigned,
            ColumnEdit::SetZerofill(zerofill) => column.data_type.zerofill = zerofill,
            ColumnEdit::SetNullable(nullable) => column.nullable = nullable,
            ColumnEdit::SetDefault(default) => column.default = default,
            ColumnEdit::SetComment(comment) => column.comment = comment,
            ColumnEdit::SetAutoIncrement(auto_increment) => {
                column.extra.auto_increment = auto_increment
            }
            ColumnEdit::SetCharset(charset) => column.charset = charset,
            ColumnEdit::SetCollation(collation) => column.collation = collation,
            ColumnEdit::SetKey(key) => {
                let previous = std::mem::replace(&mut column.key, key);
                if key == ColumnKey::Primary {
                    column.nullable = false;
                }
                let name = column.name.clone();
                sync_primary_key(&mut self.current, &name, previous, key);
            }
        }

        self.mark_dirty();
        Ok(())
    }

    /// Remove the column at `index` along with its index rows; foreign keys
    /// using it are marked deleted
    pub fn remove_column(&mut self, index: usize) -> DesignerResult<ColumnDesign> {
        self.ensure_editable("remove a column")?;
        if index >= self.current.columns.len() {
            return Err(DesignerError::IndexOutOfRange { kind: "column", index });
        }
        let column = self.current.columns.remove(index);

        self.current
            .indexes
            .retain(|idx| idx.column_name != column.name);
        self.current
            .foreign_keys
            .retain(|fk| !(fk.is_new && fk.columns.contains(&column.name)));
        for fk in &mut self.current.foreign_keys {
            if fk.columns.contains(&column.name) {
                fk.is_deleted = true;
            }
        }

        self.mark_dirty();
        Ok(column)
    }

    // --- Indexes ---

    pub fn add_index(&mut self, index: IndexDesign) -> DesignerResult<usize> {
        self.ensure_editable("add an index")?;
        self.current.indexes.push(index);
        self.mark_dirty();
        Ok(self.current.indexes.len() - 1)
    }

    /// Apply one edit to the index row at `index`
    pub fn edit_index(&mut self, index: usize, edit: IndexEdit) -> DesignerResult<()> {
        self.ensure_editable("edit an index")?;
        let (key_name, column_name, kind) = match self.current.indexes.get(index) {
            Some(row) => (row.key_name.clone(), row.column_name.clone(), row.kind),
            None => return Err(DesignerError::IndexOutOfRange { kind: "index", index }),
        };
        let indexes = &mut self.current.indexes;

        match edit {
            IndexEdit::Rename(name) => {
                update_group(indexes, &key_name, |row| row.key_name = name.clone())
            }
            IndexEdit::SetColumn(column) => indexes[index].column_name = column,
            IndexEdit::SetKind(new_kind) => {
                let new_key = if new_kind == IndexKind::Primary {
                    PRIMARY_KEY_NAME.to_string()
                } else if kind == IndexKind::Primary {
                    column_name
                } else {
                    key_name.clone()
                };
                if new_kind == IndexKind::Primary && kind != IndexKind::Primary {
                    let columns: Vec<String> = indexes
                        .iter()
                        .filter(|row| row.key_name == key_name)
                        .map(|row| row.column_name.clone())
                        .collect();
                    replace_primary_key(&mut self.current, &columns);
                }
                update_group(&mut self.current.indexes, &key_name, |row| {
                    row.kind = new_kind;
                    row.key_name = new_key.clone();
                });
            }
            IndexEdit::SetMethod(method) => update_group(indexes, &key_name, |row| row.method = method),
            IndexEdit::SetComment(comment) => {
                update_group(indexes, &key_name, |row| row.comment = comment.clone())
            }
        }

        self.mark_dirty();
        Ok(())
    }

    pub fn remove_index(&mut self, index: usize) -> DesignerResult<IndexDesign> {
        self.ensure_editable("remove an index")?;
        if index >= self.current.indexes.len() {
            return Err(DesignerError::IndexOutOfRange { kind: "index", index });
        }
        let removed = self.current.indexes.remove(index);
        self.mark_dirty();
        Ok(removed)
    }

    // --- Foreign keys ---

    /// Append a foreign key; it is always treated as new
    pub fn add_foreign_key(&mut self, mut fk: ForeignKeyDesign) -> DesignerResult<usize> {
        self.ensure_editable("add a foreign key")?;
        fk.is_new = true;
        fk.is_deleted = false;
        fk.original_name = None;
        self.current.foreign_keys.push(fk);
        self.mark_dirty();
        Ok(self.current.foreign_keys.len() - 1)
    }

    /// Apply one edit to the foreign key at `index`
    pub fn edit_foreign_key(&mut self, index: usize, edit: ForeignKeyEdit) -> DesignerResult<()> {
        self.ensure_editable("edit a foreign key")?;
        let fk = self
            .current
            .foreign_keys
            .get_mut(index)
            .ok_or(DesignerError::IndexOutOfRange { kind: "foreign key", index })?;

        match edit {
            ForeignKeyEdit::Rename(name) => fk.name = name,
            ForeignKeyEdit::SetColumn(column) => set_first(&mut fk.columns, column),
            ForeignKeyEdit::SetReferencedTable(table) => {
                if fk.referenced_table != table {
                    fk.referenced_columns.clear();
                }
                fk.referenced_table = table;
            }
            ForeignKeyEdit::SetReferencedColumn(column) => {
                set_first(&mut fk.referenced_columns, column)
            }
            ForeignKeyEdit::SetOnUpdate(action) => fk.on_update = action,
            ForeignKeyEdit::SetOnDelete(action) => fk.on_delete = action,
        }

        self.mark_dirty();
        Ok(())
    }

    /// Remove a foreign key: new ones disappear, loaded ones are marked deleted
    pub fn remove_foreign_key(&mut self, index: usize) -> DesignerResult<()> {
        self.ensure_editable("remove a foreign key")?;
        let is_new = match self.current.foreign_keys.get(index) {
            Some(fk) => fk.is_new,
            None => return Err(DesignerError::IndexOutOfRange { kind: "foreign key", index }),
        };
        if is_new {
            self.current.foreign_keys.remove(index);
        } else {
            self.current.foreign_keys[index].is_deleted = true;
        }
        self.mark_dirty();
        Ok(())
    }

    // --- Options ---

    pub fn edit_options(&mut self, edit: impl FnOnce(&mut TableOptions)) -> DesignerResult<()> {
        self.ensure_editable("edit table options")?;
        edit(&mut self.current.options);
        self.mark_dirty();
        Ok(())
    }

    /// Replace the edited snapshot wholesale, e.g. with a design read from a file.
    ///
    /// Existing columns and foreign keys that carry no `original_name` are
    /// matched to the loaded table by name; anything unmatched is new.
    pub fn apply_design(&mut self, mut design: TableSnapshot) -> DesignerResult<()> {
        self.ensure_editable("apply a design")?;
        let original = self.original.as_ref();

        for column in &mut design.columns {
            if column.is_new || column.original_name.is_some() {
                continue;
            }
            match original.and_then(|o| o.columns.iter().find(|c| c.name == column.name)) {
                Some(_) => column.original_name = Some(column.name.clone()),
                None => column.is_new = true,
            }
        }
        for fk in &mut design.foreign_keys {
            if fk.is_new || fk.original_name.is_some() {
                continue;
            }
            match original.and_then(|o| o.foreign_keys.iter().find(|f| f.name == fk.name)) {
                Some(_) => fk.original_name = Some(fk.name.clone()),
                None => fk.is_new = true,
            }
        }

        self.current = design;
        self.mark_dirty();
        Ok(())
    }

    // --- Saving ---

    /// The statement a save would send, without changing any state
    pub fn preview(&self) -> DesignerResult<DdlStatement> {
        self.ensure_state(
            "preview",
            &[EditorState::Ready, EditorState::Dirty],
        )?;
        self.synthesizer.synthesize(
            &self.database,
            &self.table_name,
            self.original.as_ref(),
            &self.current,
            self.is_new_table,
        )
    }

    /// Synthesize and execute the pending changes.
    ///
    /// A validation failure leaves the state as it was. A database failure
    /// returns to `Dirty` with every edit kept. On success the table is
    /// reloaded through `loader` when given; otherwise, or if the reload
    /// fails, the edited snapshot becomes the new original.
    pub async fn save(
        &mut self,
        connection: &dyn Connection,
        loader: Option<&SnapshotLoader>,
    ) -> DesignerResult<DdlStatement> {
        self.ensure_editable("save")?;
        let previous = self.state;
        self.state = EditorState::Saving;

        let statement = match self.synthesizer.synthesize(
            &self.database,
            &self.table_name,
            self.original.as_ref(),
            &self.current,
            self.is_new_table,
        ) {
            Ok(statement) => statement,
            Err(err) => {
                self.state = previous;
                self.last_error = Some(err.to_string());
                return Err(err);
            }
        };

        tracing::info!(
            database = %self.database,
            table = %self.table_name,
            kind = ?statement.kind,
            clauses = statement.clauses.len(),
            "saving table structure"
        );
        tracing::debug!(sql = %statement.sql, "executing DDL");

        if let Err(err) = connection.execute(&statement.sql).await {
            let err = DesignerError::from(err);
            tracing::warn!(table = %self.table_name, error = %err, "save rejected by the database");
            self.state = EditorState::Dirty;
            self.last_error = Some(err.to_string());
            return Err(err);
        }

        self.is_new_table = false;
        let reloaded = match loader {
            Some(loader) => match loader.load_snapshot(&self.database, &self.table_name).await {
                Ok(snapshot) => Some(snapshot),
                Err(err) => {
                    tracing::warn!(table = %self.table_name, error = %err, "reload after save failed, keeping edited structure");
                    None
                }
            },
            None => None,
        };
        let snapshot = reloaded.unwrap_or_else(|| self.current.committed());

        self.original = Some(snapshot.clone());
        self.current = snapshot;
        self.state = EditorState::Ready;
        self.last_error = None;
        Ok(statement)
    }

    // --- Closing ---

    /// Close unless there are unsaved edits
    pub fn request_close(&mut self) -> DesignerResult<CloseDecision> {
        self.ensure_state(
            "close",
            &[
                EditorState::Loading,
                EditorState::Ready,
                EditorState::Dirty,
                EditorState::Closed,
            ],
        )?;
        if self.state == EditorState::Dirty {
            return Ok(CloseDecision::ConfirmDiscard);
        }
        self.state = EditorState::Closed;
        Ok(CloseDecision::Closed)
    }

    /// Close, discarding any unsaved edits
    pub fn close(&mut self) -> DesignerResult<()> {
        self.ensure_state(
            "close",
            &[
                EditorState::Loading,
                EditorState::Ready,
                EditorState::Dirty,
                EditorState::Closed,
            ],
        )?;
        self.state = EditorState::Closed;
        Ok(())
    }
}

/// Point index rows and foreign keys at a column's new name
fn rename_column_references(snapshot: &mut TableSnapshot, old_name: &str, new_name: &str) {
    for idx in &mut snapshot.indexes {
        if idx.column_name == old_name {
            idx.column_name = new_name.to_string();
        }
    }
    for fk in &mut snapshot.foreign_keys {
        for column in &mut fk.columns {
            if column == old_name {
                *column = new_name.to_string();
            }
        }
    }
}

/// Drop attributes the column's new type cannot carry
fn fit_to_type(column: &mut ColumnDesign, clear_length: bool) {
    let Some(info) = lookup_data_type(&column.data_type.base_type) else {
        return;
    };
    if !info.supports_unsigned {
        column.data_type.unsigned = false;
        column.data_type.zerofill = false;
    }
    if !info.supports_charset {
        column.charset = None;
        column.collation = None;
    }
    if !info.supports_auto_increment {
        column.extra.auto_increment = false;
    }
    if clear_length && !info.supports_length {
        column.data_type.length.clear();
    }
}

/// Keep the PRIMARY index rows in step with a column's key role
fn sync_primary_key(snapshot: &mut TableSnapshot, column: &str, previous: ColumnKey, key: ColumnKey) {
    if key == ColumnKey::Primary && previous != ColumnKey::Primary {
        replace_primary_key(snapshot, &[column.to_string()]);
        snapshot.indexes.push(IndexDesign::primary(column));
    } else if previous == ColumnKey::Primary && key != ColumnKey::Primary {
        snapshot
            .indexes
            .retain(|idx| !(idx.key_name == PRIMARY_KEY_NAME && idx.column_name == column));
    }
}

/// Drop the current PRIMARY rows and hand the primary key role to `columns`
fn replace_primary_key(snapshot: &mut TableSnapshot, columns: &[String]) {
    snapshot.indexes.retain(|idx| idx.key_name != PRIMARY_KEY_NAME);
    for column in &mut snapshot.columns {
        if columns.contains(&column.name) {
            column.key = ColumnKey::Primary;
            column.nullable = false;
        } else if column.key == ColumnKey::Primary {
            column.key = ColumnKey::None;
        }
    }
}

fn update_group(indexes: &mut [IndexDesign], key_name: &str, mut update: impl FnMut(&mut IndexDesign)) {
    indexes
        .iter_mut()
        .filter(|row| row.key_name == key_name)
        .for_each(|row| update(row));
}

fn set_first(values: &mut Vec<String>, value: String) {
    match values.first_mut() {
        Some(first) => *first = value,
        None => values.push(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded() -> TableEditor {
        let snapshot = TableSnapshot::new_default()
            .with_column(ColumnDesign::new("id", "int(11)").primary_key().auto_increment().existing())
            .with_column(ColumnDesign::new("email", "varchar(255)").charset("utf8mb4", "utf8mb4_general_ci").existing())
            .with_index(IndexDesign::primary("id"))
            .with_index(IndexDesign::new("ix_email", "email"))
            .with_foreign_key(
                ForeignKeyDesign::new("fk_email")
                    .column("email")
                    .references("accounts")
                    .referenced_column("email")
                    .existing(),
            );
        let mut editor = TableEditor::begin_open("shop", "users", AlterStrategy::Minimal);
        editor.original = Some(snapshot.clone());
        editor.current = snapshot;
        editor.state = EditorState::Ready;
        editor
    }

    #[test]
    fn test_mutations_require_ready_or_dirty() {
        let mut editor = TableEditor::begin_open("shop", "users", AlterStrategy::Minimal);
        let err = editor
            .add_column(ColumnDesign::new("a", "int"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot add a column while the editor is loading");
    }

    #[test]
    fn test_rename_keeps_original_name_and_rewrites_references() {
        let mut editor = loaded();
        editor.edit_column(1, ColumnEdit::Rename("mail".into())).unwrap();

        let current = editor.current();
        assert_eq!(current.columns[1].name, "mail");
        assert_eq!(current.columns[1].original_name.as_deref(), Some("email"));
        assert!(!current.columns[1].is_new);
        assert_eq!(current.indexes[1].column_name, "mail");
        assert_eq!(current.foreign_keys[0].columns, vec!["mail"]);
        assert!(editor.is_dirty());
    }

    #[test]
    fn test_added_columns_are_always_new() {
        let mut editor = loaded();
        let index = editor
            .add_column(ColumnDesign::new("age", "int").existing())
            .unwrap();
        let column = &editor.current().columns[index];
        assert!(column.is_new);
        assert!(column.original_name.is_none());
    }

    #[test]
    fn test_type_change_clears_incompatible_attributes() {
        let mut editor = loaded();
        editor.edit_column(1, ColumnEdit::SetType("int(10) unsigned".into())).unwrap();
        let column = &editor.current().columns[1];
        assert!(column.data_type.unsigned);
        assert!(column.charset.is_none());
        assert!(column.collation.is_none());

        editor.edit_column(0, ColumnEdit::SetBaseType("text".into())).unwrap();
        let column = &editor.current().columns[0];
        assert_eq!(column.data_type, TypeDescriptor::new("text"));
        assert!(!column.extra.auto_increment);
    }

    #[test]
    fn test_unknown_type_keeps_attributes() {
        let mut editor = loaded();
        editor.edit_column(1, ColumnEdit::SetBaseType("citext".into())).unwrap();
        let column = &editor.current().columns[1];
        assert_eq!(column.data_type.sql_type(), "citext(255)");
        assert_eq!(column.charset.as_deref(), Some("utf8mb4"));
    }

    #[test]
    fn test_remove_column_cleans_up_indexes_and_foreign_keys() {
        let mut editor = loaded();
        editor
            .add_foreign_key(
                ForeignKeyDesign::new("fk_new")
                    .column("email")
                    .references("other")
                    .referenced_column("email"),
            )
            .unwrap();
        editor.remove_column(1).unwrap();

        let current = editor.current();
        assert_eq!(current.indexes.len(), 1);
        assert_eq!(current.foreign_keys.len(), 1);
        assert!(current.foreign_keys[0].is_deleted);
        assert_eq!(current.foreign_keys[0].original_name.as_deref(), Some("fk_email"));
    }

    #[test]
    fn test_index_kind_changes_follow_primary_naming() {
        let mut editor = loaded();
        editor.edit_index(0, IndexEdit::SetKind(IndexKind::Unique)).unwrap();
        assert_eq!(editor.current().indexes[0].key_name, "id");

        editor.edit_index(1, IndexEdit::SetKind(IndexKind::Primary)).unwrap();
        assert_eq!(editor.current().indexes[1].key_name, PRIMARY_KEY_NAME);
    }

    #[test]
    fn test_new_primary_column_replaces_the_old_one() {
        let mut editor = loaded();
        editor.edit_column(1, ColumnEdit::SetKey(ColumnKey::Primary)).unwrap();

        let current = editor.current();
        let primary: Vec<&str> = current
            .indexes
            .iter()
            .filter(|i| i.key_name == PRIMARY_KEY_NAME)
            .map(|i| i.column_name.as_str())
            .collect();
        assert_eq!(primary, vec!["email"]);
        assert_eq!(current.columns[0].key, ColumnKey::None);
        assert_eq!(current.columns[1].key, ColumnKey::Primary);
    }

    #[test]
    fn test_index_made_primary_replaces_the_old_primary_key() {
        let mut editor = loaded();
        editor.edit_index(1, IndexEdit::SetKind(IndexKind::Primary)).unwrap();

        let current = editor.current();
        assert_eq!(current.indexes.len(), 1);
        assert_eq!(current.indexes[0].key_name, PRIMARY_KEY_NAME);
        assert_eq!(current.indexes[0].column_name, "email");
        assert_eq!(current.columns[0].key, ColumnKey::None);
        assert_eq!(current.columns[1].key, ColumnKey::Primary);
        assert!(!current.columns[1].nullable);
    }

    #[test]
    fn test_set_key_primary_adds_primary_row() {
        let mut editor = loaded();
        editor.edit_column(0, ColumnEdit::SetKey(ColumnKey::None)).unwrap();
        assert!(editor.current().indexes.iter().all(|i| i.key_name != PRIMARY_KEY_NAME));

        editor.edit_column(1, ColumnEdit::SetKey(ColumnKey::Primary)).unwrap();
        let current = editor.current();
        assert!(!current.columns[1].nullable);
        assert!(current
            .indexes
            .iter()
            .any(|i| i.key_name == PRIMARY_KEY_NAME && i.column_name == "email"));
    }

    #[test]
    fn test_remove_foreign_key() {
        let mut editor = loaded();
        let index = editor
            .add_foreign_key(ForeignKeyDesign::new("fk_tmp").column("id").references("t").referenced_column("id"))
            .unwrap();
        editor.remove_foreign_key(index).unwrap();
        assert_eq!(editor.current().foreign_keys.len(), 1);

        editor.remove_foreign_key(0).unwrap();
        assert!(editor.current().foreign_keys[0].is_deleted);
    }

    #[test]
    fn test_referenced_table_change_clears_columns() {
        let mut editor = loaded();
        editor
            .edit_foreign_key(0, ForeignKeyEdit::SetReferencedTable("profiles".into()))
            .unwrap();
        assert!(editor.current().foreign_keys[0].referenced_columns.is_empty());

        editor
            .edit_foreign_key(0, ForeignKeyEdit::SetReferencedColumn("mail".into()))
            .unwrap();
        assert_eq!(editor.current().foreign_keys[0].referenced_columns, vec!["mail"]);
    }

    #[test]
    fn test_out_of_range_rows() {
        let mut editor = loaded();
        let err = editor.edit_column(9, ColumnEdit::SetNullable(false)).unwrap_err();
        assert_eq!(err.to_string(), "No column at row 9");
        assert_eq!(editor.state(), EditorState::Ready);
    }

    #[test]
    fn test_preview_does_not_change_state() {
        let mut editor = loaded();
        assert!(editor.preview().unwrap_err().is_validation());

        editor.edit_options(|o| o.comment = Some("people".into())).unwrap();
        let statement = editor.preview().unwrap();
        assert_eq!(statement.sql, "ALTER TABLE `shop`.`users`\n  COMMENT='people'");
        assert_eq!(editor.state(), EditorState::Dirty);
    }

    #[test]
    fn test_close_asks_for_confirmation_when_dirty() {
        let mut editor = loaded();
        editor.edit_column(1, ColumnEdit::SetComment("login".into())).unwrap();
        assert_eq!(editor.request_close().unwrap(), CloseDecision::ConfirmDiscard);
        assert_eq!(editor.state(), EditorState::Dirty);

        editor.close().unwrap();
        assert_eq!(editor.state(), EditorState::Closed);
        assert!(editor.edit_column(1, ColumnEdit::SetComment("x".into())).is_err());
    }

    #[test]
    fn test_close_when_clean() {
        let mut editor = loaded();
        assert_eq!(editor.request_close().unwrap(), CloseDecision::Closed);
    }

    #[test]
    fn test_new_table_name() {
        let mut editor = TableEditor::new_table("shop", "", AlterStrategy::Minimal);
        editor.set_table_name("orders").unwrap();
        assert_eq!(editor.table_name(), "orders");
        assert_eq!(editor.current().options, TableOptions::mysql());

        let mut existing = loaded();
        assert!(existing.set_table_name("people").unwrap_err().is_validation());
    }

    #[test]
    fn test_applied_design_is_matched_by_name() {
        let mut editor = loaded();
        let mut phone = ColumnDesign::new("phone", "varchar(20)");
        phone.is_new = false;
        let mut id = ColumnDesign::new("id", "int(11)").primary_key().auto_increment();
        id.is_new = false;
        let design = TableSnapshot::new_default()
            .with_column(id)
            .with_column(phone)
            .with_index(IndexDesign::primary("id"));

        editor.apply_design(design).unwrap();

        assert_eq!(editor.current().columns[0].original_name.as_deref(), Some("id"));
        assert!(editor.current().columns[1].is_new);
        assert_eq!(
            editor.preview().unwrap().clauses,
            vec![
                "ADD COLUMN `phone` varchar(20) NULL DEFAULT NULL",
                "DROP COLUMN `email`",
                "DROP INDEX `ix_email`",
                "DROP FOREIGN KEY `fk_email`",
            ]
        );
    }
}
