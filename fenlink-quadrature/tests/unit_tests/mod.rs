mod strength;
