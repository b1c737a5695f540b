//! Diesel schema for integration persistence.

diesel::table! {
    /// Configured links between local boards and remote projects.
    integrations (id) {
        /// Integration identifier.
        id -> Uuid,
        /// Remote tracker discriminator.
        #[max_length = 50]
        remote_system -> Varchar,
        /// Remote project identifier.
        remote_project_id -> Text,
        /// Remote project display name.
        remote_project_name -> Text,
        /// Board the integration populates.
        local_board_id -> Uuid,
        /// Field mappings JSON payload.
        field_mappings -> Jsonb,
        /// Remote item type filter JSON payload.
        type_filter -> Jsonb,
        /// Remote field written on push-back.
        status_field_id -> Nullable<Text>,
        /// Last successful sync.
        last_sync_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
