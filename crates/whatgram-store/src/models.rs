/// Row of the `kv_store` table.
pub struct EntryRow {
    pub key: String,
    pub value: String,
    pub updated_at: String,
}
