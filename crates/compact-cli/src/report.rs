//! Rendering of failed commands.
//!
//! ```text
//! Failed to initialize contract
//! (cause)
//! .. Failed to parse argument with index 0
//!    Failed to parse string 'abc' as type of bigint
//!    Cannot convert abc to a BigInt
//! ```

/// Render `err` and its cause chain.
pub fn render(err: &anyhow::Error) -> String {
    let mut chain = err.chain().map(ToString::to_string);
    let mut out = chain.next().unwrap_or_default();
    for (depth, cause) in chain.enumerate() {
        out.push_str(if depth == 0 { "\n(cause)\n.. " } else { "\n   " });
        out.push_str(&cause);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_single_message() {
        assert_eq!(render(&anyhow!("Failed to invoke circuit")), "Failed to invoke circuit");
    }

    #[test]
    fn test_cause_chain_is_indented() {
        let err = anyhow!("Cannot convert abc to a BigInt")
            .context("Failed to parse string 'abc' as type of bigint")
            .context("Failed to initialize contract");
        assert_eq!(
            render(&err),
            "Failed to initialize contract\n\
             (cause)\n\
             .. Failed to parse string 'abc' as type of bigint\n   \
             Cannot convert abc to a BigInt"
        );
    }
}
