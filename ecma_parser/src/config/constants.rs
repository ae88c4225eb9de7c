pub mod compile_time {
    pub mod lexical {
        /// Maximum number of tokens produced for a single source text
        /// Prevents runaway memory growth on pathological input
        pub const MAX_TOKEN_COUNT: usize = 1_000_000;
    }

    pub mod syntax {
        /// Maximum parser recursion depth to prevent stack overflow
        /// on deeply nested expressions and statements
        pub const MAX_PARSE_DEPTH: usize = 200;

        /// Token lookahead limit for parsing decisions
        pub const MAX_LOOKAHEAD_TOKENS: usize = 4;

        /// Maximum scope stack depth (nested function bodies)
        pub const MAX_SCOPE_DEPTH: usize = 100;
    }
}
