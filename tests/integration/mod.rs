mod journal_scenarios;
mod mcp_protocol;
