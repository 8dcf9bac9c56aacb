//! The fixed instruction block sent ahead of every diff.

/// Instructions prepended verbatim to the staged diff.
///
/// The model's single-line output format depends on this exact text.
pub const FIXED_TEMPLATE: &str = concat!(
    "You are a Git commit message generator.\n",
    "\n",
    "TASK:\n",
    "Write a SINGLE-LINE Git commit subject summarizing the changes below.\n",
    "\n",
    "HARD RULES:\n",
    "- Output ONLY that one line, nothing else.\n",
    "- No code fences, no quotes, no explanations, no prefixes.\n",
    "- Use imperative mood (e.g., 'fix', 'add', 'update', 'remove').\n",
    "- Do NOT echo the diff or any text other than the commit message.\n",
    "- End output immediately after that line.\n",
    "\n",
    "Diff follows:\n\n",
);
