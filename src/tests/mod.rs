mod classify;
mod compose;
mod dice;
mod expr;
mod locale;
mod parse;
mod pipeline;
mod stats;
