//! Diesel schema for board and task persistence.

diesel::table! {
    /// Local kanban boards.
    boards (id) {
        /// Board identifier.
        id -> Uuid,
        /// Board display name.
        #[max_length = 255]
        name -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Task records, optionally linked to a remote item.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Owning board.
        board_id -> Uuid,
        /// Task title.
        title -> Text,
        /// Optional task description.
        description -> Nullable<Text>,
        /// Task status.
        #[max_length = 50]
        status -> Varchar,
        /// Remote link metadata.
        remote -> Nullable<Jsonb>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(tasks -> boards (board_id));
diesel::allow_tables_to_appear_in_same_query!(boards, tasks);
