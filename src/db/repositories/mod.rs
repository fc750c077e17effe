mod snippets;
