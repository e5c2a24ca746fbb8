/// Sayings shown on the home screen, one picked per visit.
pub const FINANCIAL_QUOTES: [&str; 10] = [
    "Successful investing is about time in the market, not timing the market. - Warren Buffett",
    "Making money is easy; keeping it is hard. - Andrew Carnegie",
    "Saving is a gift to your future self. - Anonymous",
    "The most important thing in investing is controlling your emotions. - Benjamin Graham",
    "The way to get rich is to spend less than you earn. - Richard Templar",
    "Money is a good servant but a bad master. - Francis Bacon",
    "Investing is a belief in the future. - Anonymous",
    "Compound interest is the most powerful force in the world. - Albert Einstein",
    "Lose money and you lose little; lose honour and you lose much; lose courage and you lose everything. - Goethe",
    "Money can buy what you want, but it cannot buy happiness. - Anonymous",
];
