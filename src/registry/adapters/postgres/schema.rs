//! Diesel schema for registry persistence.

diesel::table! {
    /// Nodes that announced themselves to the coordinator.
    known_nodes (name) {
        /// Node name.
        #[max_length = 255]
        name -> Varchar,
        /// Host used to reach the node.
        #[max_length = 255]
        host -> Varchar,
        /// Announced port.
        port -> Int4,
        /// Reported status.
        #[max_length = 50]
        status -> Varchar,
        /// Node metadata as a JSON object of strings.
        metadata -> Jsonb,
        /// First registration timestamp.
        registered_at -> Timestamptz,
        /// Latest update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Task registrations, unique per node and task name.
    task_registrations (id) {
        /// Registration identifier.
        id -> Uuid,
        /// Owning node name.
        #[max_length = 255]
        node_name -> Varchar,
        /// Task name.
        #[max_length = 255]
        name -> Varchar,
        /// Endpoint path on the node.
        #[max_length = 1024]
        endpoint -> Varchar,
        /// Task type.
        #[max_length = 50]
        task_type -> Varchar,
        /// Endpoint port.
        port -> Int4,
        /// Dispatch state.
        #[max_length = 50]
        state -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Latest update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only run history per registration.
    task_run_info (id) {
        /// Record identifier.
        id -> Uuid,
        /// Referenced registration.
        registration_id -> Uuid,
        /// Opaque run payload.
        info -> Nullable<Jsonb>,
        /// Write timestamp.
        recorded_at -> Timestamptz,
    }
}

diesel::joinable!(task_run_info -> task_registrations (registration_id));
diesel::allow_tables_to_appear_in_same_query!(known_nodes, task_registrations, task_run_info);
