mod generate;
mod parse;
