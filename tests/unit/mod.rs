mod basic_tests;
mod streak_rules;
